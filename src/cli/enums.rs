//! CLI enum types for scan axis and filter options.

use clap::ValueEnum;

use crate::filters::FilterKind;
use crate::scan::ScanAxis;

/// Which way the scan line sweeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Axis {
    /// Top to bottom
    #[default]
    Vertical,
    /// Left to right
    Horizontal,
    /// Both at once
    Both,
}

impl From<Axis> for ScanAxis {
    fn from(a: Axis) -> Self {
        match a {
            Axis::Vertical => ScanAxis::Vertical,
            Axis::Horizontal => ScanAxis::Horizontal,
            Axis::Both => ScanAxis::Both,
        }
    }
}

/// Filter applied to frozen strips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Filter {
    #[default]
    Normal,
    Grayscale,
    Invert,
    Sepia,
    Edges,
    Mosaic,
}

impl From<Filter> for FilterKind {
    fn from(f: Filter) -> Self {
        match f {
            Filter::Normal => FilterKind::Identity,
            Filter::Grayscale => FilterKind::Grayscale,
            Filter::Invert => FilterKind::Invert,
            Filter::Sepia => FilterKind::Sepia,
            Filter::Edges => FilterKind::EdgeDetect,
            Filter::Mosaic => FilterKind::Mosaic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_to_scan_axis() {
        assert_eq!(ScanAxis::from(Axis::Vertical), ScanAxis::Vertical);
        assert_eq!(ScanAxis::from(Axis::Horizontal), ScanAxis::Horizontal);
        assert_eq!(ScanAxis::from(Axis::Both), ScanAxis::Both);
    }

    #[test]
    fn test_filter_to_filter_kind() {
        assert_eq!(FilterKind::from(Filter::Normal), FilterKind::Identity);
        assert_eq!(FilterKind::from(Filter::Grayscale), FilterKind::Grayscale);
        assert_eq!(FilterKind::from(Filter::Invert), FilterKind::Invert);
        assert_eq!(FilterKind::from(Filter::Sepia), FilterKind::Sepia);
        assert_eq!(FilterKind::from(Filter::Edges), FilterKind::EdgeDetect);
        assert_eq!(FilterKind::from(Filter::Mosaic), FilterKind::Mosaic);
    }

    #[test]
    fn test_cli_names_parse_as_config_names() {
        // Values written by `--filter` must also be accepted in config.toml
        for filter in Filter::value_variants() {
            let name = filter.to_possible_value().unwrap().get_name().to_string();
            assert_eq!(FilterKind::from_str(&name), Some(FilterKind::from(*filter)));
        }
        for axis in Axis::value_variants() {
            let name = axis.to_possible_value().unwrap().get_name().to_string();
            assert_eq!(ScanAxis::from_str(&name), Some(ScanAxis::from(*axis)));
        }
    }
}
