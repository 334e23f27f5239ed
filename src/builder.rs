//! Provides [`RegionTableBuilder`].
use std::path::PathBuf;

use crate::nadcon5::{RegionDefinition, RegionTable};

/// The builder of [`RegionTable`].
///
/// # Example
///
/// ```
/// # use gridshift::*;
/// # use gridshift::nadcon5::RegionDefinition;
/// let table = RegionTableBuilder::new()
///     .directory("/usr/share/nadcon5")
///     .region(RegionDefinition::new(
///         "conus",
///         "20160901",
///         Bounds::new(235.0, 24.0, 294.0, 50.0),
///         ["NAD27", "NAD83(1986)"],
///     ))
///     .build();
///
/// assert_eq!(table.regions().len(), 1);
/// assert_eq!(table.regions()[0].grids().len(), 1);
/// ```
#[derive(Debug, Default, Clone)]
pub struct RegionTableBuilder {
    directory: Option<PathBuf>,
    definitions: Vec<RegionDefinition>,
}

impl RegionTableBuilder {
    /// Makes a [`RegionTableBuilder`].
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates by the directory of the `.b` files.
    #[inline]
    pub fn directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = Some(directory.into());
        self
    }

    /// Adds a [`RegionDefinition`].
    #[inline]
    pub fn region(mut self, definition: RegionDefinition) -> Self {
        self.definitions.push(definition);
        self
    }

    /// Adds [`RegionDefinition`]s.
    #[inline]
    pub fn regions(mut self, definitions: impl IntoIterator<Item = RegionDefinition>) -> Self {
        self.definitions.extend(definitions);
        self
    }

    /// Adds the regions of the NADCON5.0 release.
    ///
    /// # Example
    ///
    /// ```
    /// # use gridshift::*;
    /// let table = RegionTableBuilder::new()
    ///     .directory("/usr/share/nadcon5")
    ///     .nadcon5()
    ///     .build();
    ///
    /// assert_eq!(table.region("hawaii").unwrap().datums()[0], "OHD");
    /// ```
    #[inline]
    pub fn nadcon5(self) -> Self {
        self.regions(RegionDefinition::nadcon5())
    }

    /// Builds [`RegionTable`].
    ///
    /// # Safety
    ///
    /// Panics when `directory` is not assigned.
    #[inline]
    pub fn build(self) -> RegionTable {
        RegionTable::new(
            self.directory.expect("directory is not assigned"),
            self.definitions,
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Bounds;

    #[test]
    #[should_panic(expected = "directory is not assigned")]
    fn test_panic() {
        let _ = RegionTableBuilder::new().build();
    }

    #[test]
    fn test_impl() {
        let table = RegionTableBuilder::new()
            .directory("data")
            .region(RegionDefinition::new(
                "first",
                "20160901",
                Bounds::new(0.0, 0.0, 1.0, 1.0),
                ["A", "B", "C"],
            ))
            .regions([RegionDefinition::new(
                "second",
                "20160901",
                Bounds::new(1.0, 1.0, 2.0, 2.0),
                ["A"],
            )])
            .build();

        assert_eq!(table.directory(), std::path::Path::new("data"));

        let names: Vec<_> = table.regions().iter().map(|r| r.name()).collect();
        assert_eq!(names, ["first", "second"]);
        assert_eq!(table.regions()[0].grids().len(), 2);
        assert_eq!(table.regions()[1].index(), 1);
    }

    #[test]
    fn test_nadcon5() {
        let table = RegionTableBuilder::new().directory("data").nadcon5().build();
        assert_eq!(table.regions().len(), 9);
        assert_eq!(table.regions()[0].name(), "conus");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde() {
        let json = r#"[{
            "name": "test",
            "date": "20160901",
            "bounds": {"min_x": 235.0, "min_y": 40.0, "max_x": 236.0, "max_y": 41.0},
            "datums": ["A1900", "B1950"]
        }]"#;
        let definitions: Vec<RegionDefinition> = serde_json::from_str(json).unwrap();

        let table = RegionTableBuilder::new()
            .directory("data")
            .regions(definitions)
            .build();
        assert_eq!(table.regions()[0].grids()[0].source(), "A1900");
        assert!(table.find(-124.5, 40.5).is_some());
    }
}
