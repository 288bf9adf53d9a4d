//! Exit codes used by the mdlite binary

/// Everything rendered
pub const SUCCESS: i32 = 0;

/// At least one input could not be read or written
pub const RENDER_FAILURE: i32 = 1;

/// Invalid configuration, bad arguments or another problem with the tool itself
pub const TOOL_ERROR: i32 = 2;
