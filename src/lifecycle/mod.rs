pub(crate) mod config;
pub(crate) mod controller;
pub(crate) mod headless;
pub(crate) mod host;
