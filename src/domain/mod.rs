pub mod level;
pub mod palette;
pub mod ring;
pub mod screen;
pub mod snake;
pub mod surface;
