pub mod app;
pub mod components;
pub mod joystick;
pub mod tabs;
pub mod theme;
