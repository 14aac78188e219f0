use std::collections::HashSet;

/// Mesh names of the house model that are glazing and must be drawn
/// separately with blending.
pub const HOUSE_WINDOW_NAMES: [&str; 17] = [
    "Window.008_Cube.063",
    "Window.007_Cube.062",
    "Window.006_Cube.061",
    "Window.005_Cube.060",
    "Window.004_Cube.059",
    "Window.003_Cube.058",
    "Window.002_Cube.057",
    "Window.001_Cube.056",
    "Window_Cube.055",
    "Door_glasswall2_Cube.012",
    "Door_glasswall1_Cube.014",
    "Ground_floor_glasswall_Cube.007",
    "Door_teracce4.1_Cube.054",
    "Door_teracce3.1_Cube.053",
    "Door_teracce2.1_Cube.052",
    "Door_teracce1.1_Cube.051",
    "water_Cube.041",
];

/// Closed set of mesh names classified as windows. Matching is exact and
/// case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowNames {
    names: HashSet<String>,
}

impl WindowNames {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// A table that classifies every mesh as structural.
    pub fn empty() -> Self {
        Self {
            names: HashSet::new(),
        }
    }

    pub fn is_window(&self, mesh_name: &str) -> bool {
        self.names.contains(mesh_name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for WindowNames {
    fn default() -> Self {
        Self::new(HOUSE_WINDOW_NAMES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_house_window_name_is_a_window() {
        let table = WindowNames::default();
        for name in HOUSE_WINDOW_NAMES {
            assert!(table.is_window(name), "{name} should be a window");
        }
        assert_eq!(table.len(), HOUSE_WINDOW_NAMES.len());
    }

    #[test]
    fn near_misses_are_structural() {
        let table = WindowNames::default();
        for name in [
            "",
            "Window",
            "window.008_Cube.063",
            "Window.008_Cube.063 ",
            "Window.009_Cube.064",
            "Roof_Cube.001",
            "water",
        ] {
            assert!(!table.is_window(name), "{name:?} should be structural");
        }
    }

    #[test]
    fn custom_tables_replace_the_defaults() {
        let table = WindowNames::new(["Skylight"]);
        assert!(table.is_window("Skylight"));
        assert!(!table.is_window("Window_Cube.055"));
        assert!(WindowNames::empty().is_empty());
    }
}
