//! Scene background

use serde::{Deserialize, Serialize};
use crate::material::TextureRef;

/// What is drawn behind everything else
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Background {
    /// Clear to a flat color (linear RGBA)
    Color([f32; 4]),
    /// Environment cube map, faces ordered +X, -X, +Y, -Y, +Z, -Z
    CubeMap { faces: [TextureRef; 6] },
}

impl Default for Background {
    fn default() -> Self {
        Background::Color([0.0, 0.0, 0.0, 1.0])
    }
}

impl Background {
    /// Cube map from a directory holding `px, nx, py, ny, pz, nz` images
    pub fn cube_map_dir(dir: &str, extension: &str) -> Self {
        let face = |name: &str| TextureRef::srgb(format!("{}/{}.{}", dir.trim_end_matches('/'), name, extension));
        Background::CubeMap {
            faces: [face("px"), face("nx"), face("py"), face("ny"), face("pz"), face("nz")],
        }
    }

    /// Clear color; cube maps clear to black before the sky is drawn
    pub fn clear_color(&self) -> [f32; 4] {
        match self {
            Background::Color(c) => *c,
            Background::CubeMap { .. } => [0.0, 0.0, 0.0, 1.0],
        }
    }

    /// Face textures, when this is a cube map
    pub fn faces(&self) -> Option<&[TextureRef; 6]> {
        match self {
            Background::CubeMap { faces } => Some(faces),
            Background::Color(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_map_face_order() {
        let bg = Background::cube_map_dir("environmentMaps/0/", "jpg");
        let faces = bg.faces().map(|f| f.iter().map(|t| t.path.clone()).collect::<Vec<_>>());
        assert_eq!(
            faces,
            Some(vec![
                "environmentMaps/0/px.jpg".to_string(),
                "environmentMaps/0/nx.jpg".to_string(),
                "environmentMaps/0/py.jpg".to_string(),
                "environmentMaps/0/ny.jpg".to_string(),
                "environmentMaps/0/pz.jpg".to_string(),
                "environmentMaps/0/nz.jpg".to_string(),
            ])
        );
    }

    #[test]
    fn test_clear_color() {
        assert_eq!(Background::default().clear_color(), [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(Background::Color([0.1, 0.2, 0.3, 1.0]).clear_color(), [0.1, 0.2, 0.3, 1.0]);
        assert!(Background::default().faces().is_none());
    }
}
