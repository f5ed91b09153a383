mod params;
pub use self::params::{QueryParams, QueryValue, LIST_SEPARATOR};

mod common;
pub use self::common::{Query, QueryCommon, RealtimeQuery};

mod series;
pub use self::series::{ObservationQuery, SeriesListQuery, SeriesUpdatesQuery};

mod tags;
pub use self::tags::{ListQuery, ReleaseDatesQuery, TagQuery};

mod geo;
pub use self::geo::{RegionalDataQuery, DEFAULT_REGIONAL_UNITS};
