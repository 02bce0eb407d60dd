pub mod bluetooth;
pub mod emitter;
pub mod logging;
