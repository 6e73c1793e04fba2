use chrono::{Duration, Utc};
use uuid::Uuid;

use lockbox_vault::domain::types::DeviceSource;
use lockbox_vault::usecase::device::{
    CleanupInactiveDevicesUseCase, DeactivateAllDevicesUseCase, DeactivateDeviceUseCase,
    ListDevicesUseCase, RegisterDeviceInput, RegisterDeviceUseCase,
};

use crate::helpers::MockDeviceRepo;

fn chrome_on_windows() -> RegisterDeviceInput {
    RegisterDeviceInput {
        device_name: None,
        browser: Some("Chrome".to_owned()),
        os: Some("Windows".to_owned()),
        source: Some("web".to_owned()),
    }
}

#[tokio::test]
async fn should_register_device_with_defaults_for_missing_hints() {
    let usecase = RegisterDeviceUseCase {
        repo: MockDeviceRepo::empty(),
    };
    let device = usecase
        .execute(
            "u1",
            RegisterDeviceInput {
                device_name: None,
                browser: None,
                os: None,
                source: None,
            },
            Utc::now(),
        )
        .await
        .unwrap();
    assert_eq!(device.browser, "Unknown");
    assert_eq!(device.os, "Unknown");
    assert_eq!(device.source, DeviceSource::Unknown);
    assert!(device.session_active);
}

#[tokio::test]
async fn should_keep_one_row_for_repeated_registration_of_same_device() {
    let repo = MockDeviceRepo::empty();
    let handle = repo.devices_handle();
    let usecase = RegisterDeviceUseCase { repo };

    let first = Utc::now();
    let second = first + Duration::minutes(10);
    usecase.execute("u1", chrome_on_windows(), first).await.unwrap();
    let device = usecase.execute("u1", chrome_on_windows(), second).await.unwrap();

    let devices = handle.lock().unwrap();
    assert_eq!(devices.len(), 1);
    assert_eq!(device.last_active, second);
    assert!(device.session_active);
}

#[tokio::test]
async fn should_keep_stored_name_when_registration_omits_it() {
    let repo = MockDeviceRepo::empty();
    let handle = repo.devices_handle();
    let usecase = RegisterDeviceUseCase { repo };

    let mut named = chrome_on_windows();
    named.device_name = Some("Work laptop".to_owned());
    usecase.execute("u1", named, Utc::now()).await.unwrap();
    let device = usecase.execute("u1", chrome_on_windows(), Utc::now()).await.unwrap();

    assert_eq!(device.device_name.as_deref(), Some("Work laptop"));
    assert_eq!(handle.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_list_only_own_devices() {
    let repo = MockDeviceRepo::empty();
    let register = RegisterDeviceUseCase { repo };
    register.execute("u1", chrome_on_windows(), Utc::now()).await.unwrap();
    register.execute("u2", chrome_on_windows(), Utc::now()).await.unwrap();

    let list = ListDevicesUseCase { repo: register.repo };
    let devices = list.execute("u1").await.unwrap();
    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].user_id, "u1");
}

#[tokio::test]
async fn should_deactivate_single_device_idempotently() {
    let repo = MockDeviceRepo::empty();
    let handle = repo.devices_handle();
    let register = RegisterDeviceUseCase { repo };
    let device = register.execute("u1", chrome_on_windows(), Utc::now()).await.unwrap();

    let deactivate = DeactivateDeviceUseCase { repo: register.repo };
    deactivate.execute("u1", device.id).await.unwrap();
    // Unknown device id is not an error.
    deactivate.execute("u1", Uuid::new_v4()).await.unwrap();

    assert!(!handle.lock().unwrap()[0].session_active);
}

#[tokio::test]
async fn should_deactivate_all_devices_for_user() {
    let repo = MockDeviceRepo::empty();
    let register = RegisterDeviceUseCase { repo };
    register.execute("u1", chrome_on_windows(), Utc::now()).await.unwrap();
    let mut firefox = chrome_on_windows();
    firefox.browser = Some("Firefox".to_owned());
    register.execute("u1", firefox, Utc::now()).await.unwrap();

    let deactivate = DeactivateAllDevicesUseCase { repo: register.repo };
    let count = deactivate.execute("u1").await.unwrap();
    assert_eq!(count, 2);
}

#[tokio::test]
async fn should_cleanup_only_devices_idle_past_retention() {
    let now = Utc::now();
    let repo = MockDeviceRepo::empty();
    let handle = repo.devices_handle();
    let register = RegisterDeviceUseCase { repo };

    register
        .execute("u1", chrome_on_windows(), now - Duration::days(31))
        .await
        .unwrap();
    let mut firefox = chrome_on_windows();
    firefox.browser = Some("Firefox".to_owned());
    register.execute("u1", firefox, now).await.unwrap();

    let cleanup = CleanupInactiveDevicesUseCase { repo: register.repo };
    let count = cleanup.execute(30, now).await.unwrap();
    assert_eq!(count, 1);

    let devices = handle.lock().unwrap();
    let stale = devices.iter().find(|d| d.browser == "Chrome").unwrap();
    let fresh = devices.iter().find(|d| d.browser == "Firefox").unwrap();
    assert!(!stale.session_active);
    assert!(fresh.session_active);
}
