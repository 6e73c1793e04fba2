pub mod credentials;
pub mod devices;
pub mod extract;
pub mod settings;
pub mod share;
pub mod token;
pub mod users;
pub mod webhook;
