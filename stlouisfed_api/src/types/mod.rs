pub mod de;

mod enums;
pub use self::enums::{
    AggregationMethod, FilterValue, FilterVariable, Frequency, OrderBy, OutputType, RegionType,
    SearchType, Seasonality, ShapeType, SortOrder, TagGroupId, Unit,
};

mod fred;
pub use self::fred::{
    Category, Observation, Release, ReleaseDate, Series, SeriesID, Source, Tag, VintageObservation,
};

mod geo;
pub use self::geo::{RegionalObservation, SeriesGroup, Shape};
