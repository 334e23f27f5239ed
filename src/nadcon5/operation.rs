use std::ops::{Deref, Range};

use tracing::{trace, warn};

use crate::error::Result;
use crate::nadcon5::{Region, RegionTable};
use crate::point::{normalize_longitude, to_positive_east};
use crate::{OperationPoint, ShiftOperation};

/// The grid sets to walk in a region.
#[derive(Debug, PartialEq, Eq, Clone)]
struct Route {
    inverse: bool,
    sets: Range<usize>,
}

/// The shift from a datum to another, through the intermediate datums of the chain.
///
/// The route is resolved per region on construction.
/// A point is shifted in the first region covering it;
/// where `source` or `target` is not in the chain of that region,
/// the point is returned unchanged as a success.
/// Use [`ChainedShift::is_applicable`] to tell that case.
///
/// On failure at any step, the point is restored.
/// On success, the longitude is normalized into -180.0 < and <= 180.0.
///
/// # Example
///
/// ```
/// # use gridshift::{OperationPoint, ShiftOperation};
/// # use gridshift::nadcon5::RegionTable;
/// let table = RegionTable::nadcon5("/path/not/installed");
/// let op = table.chained_shift("NAD27", "NAD83(2011)");
/// assert!(op.is_applicable(0));
///
/// // no file is installed
/// let mut point = OperationPoint::new(-100.0, 40.0, 0.0);
/// assert!(!op.shift(&mut point)?);
/// assert_eq!(point, OperationPoint::new(-100.0, 40.0, 0.0));
/// # Ok::<(), gridshift::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct ChainedShift<T> {
    table: T,
    source: String,
    target: String,
    routes: Vec<Option<Route>>,
}

impl<T> ChainedShift<T>
where
    T: Deref<Target = RegionTable>,
{
    /// Makes the shift from `source` to `target`, resolving the route in every region.
    pub fn new(table: T, source: &str, target: &str) -> Self {
        let routes = table
            .regions()
            .iter()
            .map(|region| {
                let from = region.datum_index(source)?;
                let to = region.datum_index(target)?;
                Some(if from > to {
                    Route {
                        inverse: true,
                        sets: to..from,
                    }
                } else {
                    Route {
                        inverse: false,
                        sets: from..to,
                    }
                })
            })
            .collect();

        Self {
            table,
            source: source.to_string(),
            target: target.to_string(),
            routes,
        }
    }

    #[inline]
    pub fn table(&self) -> &RegionTable {
        &self.table
    }

    /// Returns the source datum.
    #[inline]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the target datum.
    #[inline]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Returns `true` if both datums are in the chain of the `region_index`-th region.
    #[inline]
    pub fn is_applicable(&self, region_index: usize) -> bool {
        matches!(self.routes.get(region_index), Some(Some(_)))
    }

    /// Returns the regions where both datums are in the chain.
    pub fn regions_with_route(&self) -> impl Iterator<Item = &Region> + '_ {
        self.table
            .regions()
            .iter()
            .filter(|region| self.is_applicable(region.index()))
    }

    fn walk(&self, region: &Region, route: &Route, point: &mut OperationPoint) -> Result<bool> {
        let sets = &region.grids()[route.sets.clone()];
        if route.inverse {
            for set in sets.iter().rev() {
                if !set.shift_inverse(point)? {
                    return Ok(false);
                }
            }
        } else {
            for set in sets {
                if !set.shift_forward(point)? {
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }
}

impl<T> ShiftOperation for ChainedShift<T>
where
    T: Deref<Target = RegionTable>,
{
    fn shift(&self, point: &mut OperationPoint) -> Result<bool> {
        let saved = *point;
        let lon = to_positive_east(point.x);

        let Some(region) = self.table.find(lon, point.y) else {
            trace!(x = point.x, y = point.y, "no NADCON5 region covers the point");
            return Ok(false);
        };

        let route = match self.routes.get(region.index()) {
            Some(Some(route)) if !route.sets.is_empty() => route,
            _ => return Ok(true),
        };

        point.x = lon;
        match self.walk(region, route, point) {
            Ok(true) => {
                point.x = normalize_longitude(point.x);
                Ok(true)
            }
            Ok(false) => {
                warn!(
                    region = region.name(),
                    source = %self.source,
                    target = %self.target,
                    "NADCON5 shift unavailable, point restored"
                );
                point.restore(&saved);
                Ok(false)
            }
            Err(e) => {
                warn!(region = region.name(), error = %e, "NADCON5 shift failed, point restored");
                point.restore(&saved);
                Err(e)
            }
        }
    }
}
