use std::path::{Path, PathBuf};

use crate::freq;

/// Derived file names for one (cube, molecule, frequency window)
/// combination. Every name is a deterministic function of its inputs, so
/// presence on disk doubles as the regeneration marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductNames {
    moment_image: String,
    moment_fits: String,
    movie: String,
}

impl ProductNames {
    pub fn new(cube: &Path, mol: &str, start_ghz: f64, end_ghz: f64) -> Self {
        let base = format!(
            "{}.{}.moment0.integrated_{}-{}GHz",
            cube_stem(cube),
            mol,
            freq::format_ghz(start_ghz),
            freq::format_ghz(end_ghz)
        );

        ProductNames {
            moment_fits: format!("{}.fits", base),
            movie: format!("{}.mp4", base),
            moment_image: base,
        }
    }

    /// Toolkit-native moment image, the intermediate the FITS export reads.
    pub fn moment_image(&self) -> &str {
        &self.moment_image
    }

    pub fn moment_fits(&self) -> &str {
        &self.moment_fits
    }

    pub fn movie(&self) -> &str {
        &self.movie
    }
}

/// Path of the toolkit-native image a cube is re-imported to for movie
/// frame extraction: `<stem>.image` beside the cube.
pub fn native_image_path(cube: &Path) -> PathBuf {
    cube.with_extension("image")
}

fn cube_stem(cube: &Path) -> String {
    let name = cube
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    name.strip_suffix(".fits").unwrap_or(&name).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_names() {
        let names = ProductNames::new(
            Path::new("X_something_uid___A_B_cube.fits"),
            "CO_1-0",
            230.1,
            230.2,
        );

        assert_eq!(
            names.moment_image(),
            "X_something_uid___A_B_cube.CO_1-0.moment0.integrated_230.1-230.2GHz"
        );
        assert_eq!(
            names.moment_fits(),
            "X_something_uid___A_B_cube.CO_1-0.moment0.integrated_230.1-230.2GHz.fits"
        );
        assert_eq!(
            names.movie(),
            "X_something_uid___A_B_cube.CO_1-0.moment0.integrated_230.1-230.2GHz.mp4"
        );
    }

    #[test]
    fn test_names_ignore_cube_directory() {
        let names = ProductNames::new(Path::new("./cubes/NGC253.fits"), "SiO", 217.1049, 217.2);
        assert_eq!(
            names.moment_fits(),
            "NGC253.SiO.moment0.integrated_217.105-217.2GHz.fits"
        );
    }

    #[test]
    fn test_native_image_path() {
        assert_eq!(
            native_image_path(Path::new("cubes/NGC253_cube.fits")),
            PathBuf::from("cubes/NGC253_cube.image")
        );
    }
}
