//! Default configuration values

use crate::foundation::constants::*;

pub struct ServerDefaults;

impl ServerDefaults {
    pub const HOST: &'static str = DEFAULT_HOST;
    pub const PORT: u16 = DEFAULT_PORT;
    pub const BASE_PATH: &'static str = "";
    pub const VERBOSE_ERRORS: bool = true;
    pub const MAX_BODY_SIZE: usize = DEFAULT_MAX_BODY_SIZE;
    pub const PROTOCOL_ERROR_FRAMES: bool = false;
    pub const ENABLE_TRACING: bool = true;
}
