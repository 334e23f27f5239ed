use std::path::{Path, PathBuf};

use crate::nadcon5::{ChainedShift, Region, RegionDefinition};
use crate::point::to_positive_east;

/// The NADCON5 regions, looked up in their order.
///
/// Use [`RegionTableBuilder`](crate::RegionTableBuilder) to configure one.
///
/// # Example
///
/// ```
/// # use gridshift::nadcon5::RegionTable;
/// let table = RegionTable::nadcon5("/usr/share/nadcon5");
///
/// let region = table.find(-100.0, 40.0).unwrap();
/// assert_eq!(region.name(), "conus");
/// assert!(table.find(0.0, 0.0).is_none());
/// ```
#[derive(Debug)]
pub struct RegionTable {
    directory: PathBuf,
    regions: Vec<Region>,
}

impl RegionTable {
    /// Makes a table of `definitions` whose files are in `directory`.
    pub fn new(
        directory: impl Into<PathBuf>,
        definitions: impl IntoIterator<Item = RegionDefinition>,
    ) -> Self {
        let directory = directory.into();
        let regions = definitions
            .into_iter()
            .enumerate()
            .map(|(index, definition)| Region::new(index, definition, &directory))
            .collect();
        Self { directory, regions }
    }

    /// Makes a table of the NADCON5.0 regions whose files are in `directory`.
    pub fn nadcon5(directory: impl Into<PathBuf>) -> Self {
        Self::new(directory, RegionDefinition::nadcon5())
    }

    #[inline]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    #[inline]
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Returns the region named `name`.
    pub fn region(&self, name: &str) -> Option<&Region> {
        self.regions.iter().find(|region| region.name() == name)
    }

    /// Returns the first region covering (`lon`, `lat`) \[deg\], `lon` in any convention.
    pub fn find(&self, lon: f64, lat: f64) -> Option<&Region> {
        let lon = to_positive_east(lon);
        self.regions.iter().find(|region| region.covers(lon, lat))
    }

    /// Closes every file of the table.
    pub fn close(&self) {
        for region in &self.regions {
            region.close();
        }
    }

    /// Returns the shift from `source` to `target` borrowing `self`.
    #[inline]
    pub fn chained_shift(&self, source: &str, target: &str) -> ChainedShift<&Self> {
        ChainedShift::new(self, source, target)
    }
}
