pub mod cloud_vision;
pub mod frame;
pub mod gesture;
pub mod motion;
pub mod sampler;
pub mod scene;
pub mod smoother;
