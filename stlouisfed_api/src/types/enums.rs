//! Enumerated query parameters and their wire values.

use crate::query::QueryValue;

/// Declares a parameter enum together with its wire value, `Display`,
/// a lenient `FromStr` (wire value or any listed alias, ASCII
/// case-insensitive) and the conversion into [`QueryValue::Symbol`].
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $wire:literal $(| $alias:literal)*
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The value sent to the API.
            pub fn wire_value(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.wire_value())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                $(
                    if s.eq_ignore_ascii_case($wire) $(|| s.eq_ignore_ascii_case($alias))* {
                        return Ok($name::$variant);
                    }
                )+
                Err(format!(
                    "unknown {} '{}'. Valid values: {}",
                    stringify!($name),
                    s,
                    [$($wire),+].join(", ")
                ))
            }
        }

        impl From<$name> for QueryValue {
            fn from(value: $name) -> Self {
                QueryValue::Symbol(value.wire_value())
            }
        }
    };
}

wire_enum! {
    /// Sort results ascending or descending.
    pub enum SortOrder {
        Asc => "asc",
        Desc => "desc",
    }
}

wire_enum! {
    /// Tag group identifier.
    pub enum TagGroupId {
        Frequency => "freq" | "frequency",
        GeneralOrConcept => "gen" | "general_or_concept",
        Geography => "geo" | "geography",
        GeographyType => "geot" | "geography_type",
        Release => "rls" | "release",
        SeasonalAdjustment => "seas" | "seasonal_adjustment",
        Source => "src" | "source",
        CitationAndCopyright => "cc" | "citation_and_copyright",
    }
}

wire_enum! {
    /// Attribute used to filter series results.
    pub enum FilterVariable {
        Frequency => "frequency",
        Units => "units",
        SeasonalAdjustment => "seasonal_adjustment",
    }
}

wire_enum! {
    /// Seasonal adjustment of a regional series group.
    pub enum Seasonality {
        SeasonallyAdjusted => "SA" | "seasonally_adjusted",
        NotSeasonallyAdjusted => "NSA" | "not_seasonally_adjusted",
        SmoothedSeasonallyAdjusted => "SSA" | "smoothed_seasonally_adjusted",
    }
}

wire_enum! {
    /// Restricts series updates to macro, regional, or all series.
    pub enum FilterValue {
        Macro => "macro",
        Regional => "regional",
        All => "all",
    }
}

wire_enum! {
    /// Attribute to order results by. Each endpoint accepts a subset.
    pub enum OrderBy {
        SeriesId => "series_id",
        SeriesCount => "series_count",
        Title => "title",
        Units => "units",
        Frequency => "frequency",
        SeasonalAdjustment => "seasonal_adjustment",
        RealtimeStart => "realtime_start",
        RealtimeEnd => "realtime_end",
        LastUpdated => "last_updated",
        ObservationStart => "observation_start",
        ObservationEnd => "observation_end",
        Popularity => "popularity",
        GroupPopularity => "group_popularity",
        Created => "created",
        Name => "name",
        GroupId => "group_id",
        SearchRank => "search_rank",
        ReleaseId => "release_id",
        SourceId => "source_id",
        PressRelease => "press_release",
        ReleaseDate => "release_date",
        ReleaseName => "release_name",
    }
}

wire_enum! {
    /// Data value transformation.
    pub enum Unit {
        /// Levels (no transformation).
        Levels => "lin" | "levels",
        Change => "chg" | "change",
        ChangeFromYearAgo => "ch1" | "change_from_year_ago",
        PercentChange => "pch" | "percent_change",
        PercentChangeFromYearAgo => "pc1" | "percent_change_from_year_ago",
        CompoundedAnnualRateOfChange => "pca" | "compounded_annual_rate_of_change",
        ContinuouslyCompoundedRateOfChange => "cch" | "continuously_compounded_rate_of_change",
        ContinuouslyCompoundedAnnualRateOfChange => "cca" | "continuously_compounded_annual_rate_of_change",
        NaturalLog => "log" | "natural_log",
    }
}

wire_enum! {
    /// Lower frequency to aggregate observations to.
    pub enum Frequency {
        Daily => "d" | "daily",
        Weekly => "w" | "weekly",
        Biweekly => "bw" | "biweekly",
        Monthly => "m" | "monthly",
        Quarterly => "q" | "quarterly",
        Semiannual => "sa" | "semiannual",
        Annual => "a" | "annual",
        WeeklyEndingFriday => "wef" | "weekly_ending_friday",
        WeeklyEndingThursday => "weth" | "weekly_ending_thursday",
        WeeklyEndingWednesday => "wew" | "weekly_ending_wednesday",
        WeeklyEndingTuesday => "wetu" | "weekly_ending_tuesday",
        WeeklyEndingMonday => "wem" | "weekly_ending_monday",
        WeeklyEndingSunday => "wesu" | "weekly_ending_sunday",
        WeeklyEndingSaturday => "wesa" | "weekly_ending_saturday",
        BiweeklyEndingWednesday => "bwew" | "biweekly_ending_wednesday",
        BiweeklyEndingMonday => "bwem" | "biweekly_ending_monday",
    }
}

wire_enum! {
    /// How observations are aggregated when a lower frequency is requested.
    pub enum AggregationMethod {
        Average => "avg" | "average",
        Sum => "sum",
        EndOfPeriod => "eop" | "end_of_period",
    }
}

wire_enum! {
    /// Shape of the observations response.
    pub enum OutputType {
        /// One row per observation and real-time period.
        RealtimePeriod => "1" | "realtime_period",
        /// Every vintage as its own column.
        All => "2" | "all",
        /// Only new and revised observations, one column per vintage.
        NewAndRevised => "3" | "new_and_revised",
        /// Initial release of each observation.
        InitialReleaseOnly => "4" | "initial_release_only",
    }
}

wire_enum! {
    /// How `search_text` is matched in a series search.
    pub enum SearchType {
        FullText => "full_text",
        SeriesId => "series_id",
    }
}

wire_enum! {
    /// Region types for GeoFRED regional data.
    pub enum RegionType {
        Bea => "bea",
        Msa => "msa",
        Frb => "frb",
        Necta => "necta",
        State => "state",
        Country => "country",
        County => "county",
        CensusRegion => "censusregion",
        CensusDivision => "censusdivision",
    }
}

wire_enum! {
    /// Shape file families for GeoFRED.
    pub enum ShapeType {
        Bea => "bea",
        Msa => "msa",
        Frb => "frb",
        Necta => "necta",
        State => "state",
        Country => "country",
        County => "county",
        CensusRegion => "censusregion",
        CensusDivision => "censusdivision",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_values() {
        assert_eq!(Unit::Levels.wire_value(), "lin");
        assert_eq!(Frequency::Annual.wire_value(), "a");
        assert_eq!(OutputType::InitialReleaseOnly.wire_value(), "4");
        assert_eq!(Seasonality::NotSeasonallyAdjusted.to_string(), "NSA");
    }

    #[test]
    fn parse_wire_value_or_alias() {
        assert_eq!("freq".parse::<TagGroupId>(), Ok(TagGroupId::Frequency));
        assert_eq!("frequency".parse::<TagGroupId>(), Ok(TagGroupId::Frequency));
        assert_eq!("nsa".parse::<Seasonality>(), Ok(Seasonality::NotSeasonallyAdjusted));
        assert_eq!("Annual".parse::<Frequency>(), Ok(Frequency::Annual));
        assert_eq!("2".parse::<OutputType>(), Ok(OutputType::All));
        assert!("yearly".parse::<Frequency>().is_err());
    }

    #[test]
    fn symbol_conversion() {
        assert_eq!(QueryValue::from(SortOrder::Desc), QueryValue::Symbol("desc"));
        assert_eq!(QueryValue::from(AggregationMethod::EndOfPeriod).encode(), "eop");
    }

    #[test]
    fn all_lists_every_variant() {
        assert_eq!(RegionType::ALL.len(), 9);
        assert_eq!(OrderBy::ALL.len(), 22);
    }
}
