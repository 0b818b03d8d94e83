pub mod composite;
pub mod stamp;

/// Full-screen triangle vertices
pub(crate) const FS_TRI: [[f32; 2]; 3] = [
    [-1.0, -1.0],
    [3.0, -1.0],
    [-1.0, 3.0],
];
