//! Threshold classification and the legend axis.

use thiserror::Error;

use crate::colors::{EDUCATION_PALETTE, NO_DATA_COLOR, Rgb};

/// Value range covered by the education legend, in percent.
pub const EDUCATION_DOMAIN: (f64, f64) = (2.6, 75.1);
/// The domain is cut into this many equal steps before the palette caps it.
pub const EDUCATION_STEPS: usize = 8;
/// Pixel span of the legend axis.
pub const LEGEND_RANGE: (f64, f64) = (600.0, 860.0);

#[derive(Debug, Error, PartialEq)]
pub enum ConfigurationError {
    #[error("classification scale needs at least one threshold")]
    EmptyThresholds,
    #[error("threshold {index} is not finite ({value})")]
    NonFiniteThreshold { index: usize, value: f64 },
    #[error("threshold {index} ({value}) does not exceed the previous one ({previous})")]
    NotIncreasing {
        index: usize,
        previous: f64,
        value: f64,
    },
    #[error("{thresholds} thresholds need {} colors, palette has {colors}", .thresholds + 1)]
    PaletteSize { thresholds: usize, colors: usize },
    #[error("invalid color {0:?}")]
    InvalidColor(String),
    #[error("fallback color {0} is also a palette color")]
    FallbackInPalette(Rgb),
    #[error("axis domain [{min}, {max}] is empty or inverted")]
    InvalidDomain { min: f64, max: f64 },
}

/// N-1 strictly increasing thresholds splitting the line into N buckets,
/// one palette color per bucket, plus a color for regions without data.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationScale {
    thresholds: Vec<f64>,
    palette: Vec<Rgb>,
    fallback: Rgb,
}

impl ClassificationScale {
    pub fn new(
        thresholds: Vec<f64>,
        palette: Vec<Rgb>,
        fallback: Rgb,
    ) -> Result<Self, ConfigurationError> {
        if thresholds.is_empty() {
            return Err(ConfigurationError::EmptyThresholds);
        }
        for (index, &value) in thresholds.iter().enumerate() {
            if !value.is_finite() {
                return Err(ConfigurationError::NonFiniteThreshold { index, value });
            }
            if index > 0 && value <= thresholds[index - 1] {
                return Err(ConfigurationError::NotIncreasing {
                    index,
                    previous: thresholds[index - 1],
                    value,
                });
            }
        }
        if palette.len() != thresholds.len() + 1 {
            return Err(ConfigurationError::PaletteSize {
                thresholds: thresholds.len(),
                colors: palette.len(),
            });
        }
        if palette.contains(&fallback) {
            return Err(ConfigurationError::FallbackInPalette(fallback));
        }

        Ok(Self {
            thresholds,
            palette,
            fallback,
        })
    }

    /// Same as [`ClassificationScale::new`] with colors given as hex strings.
    pub fn from_hex(
        thresholds: Vec<f64>,
        palette: &[&str],
        fallback: &str,
    ) -> Result<Self, ConfigurationError> {
        let parse = |hex: &str| {
            Rgb::from_hex(hex).ok_or_else(|| ConfigurationError::InvalidColor(hex.to_owned()))
        };
        let palette = palette.iter().map(|hex| parse(*hex)).collect::<Result<_, _>>()?;
        Self::new(thresholds, palette, parse(fallback)?)
    }

    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    pub fn palette(&self) -> &[Rgb] {
        &self.palette
    }

    pub fn fallback(&self) -> Rgb {
        self.fallback
    }

    pub fn bucket_count(&self) -> usize {
        self.palette.len()
    }

    /// Index of the first threshold strictly greater than `value`.
    ///
    /// A value equal to a threshold belongs to the bucket above it. `NaN`
    /// compares below everything and lands in bucket 0.
    pub fn classify(&self, value: f64) -> usize {
        self.thresholds.partition_point(|&t| t <= value)
    }

    pub fn color_for(&self, value: f64) -> Rgb {
        self.palette[self.classify(value)]
    }

    /// `[lower, upper]` value extent of every bucket, read from `breaks`:
    /// bucket `i` spans `breaks[i - 1]..breaks[i]`. Ends that `breaks` does
    /// not provide are closed with `domain`.
    ///
    /// Passing [`Self::thresholds`] tiles `domain` exactly. A longer break list
    /// (the untruncated education steps) moves the last bucket's upper end to
    /// the next break instead of the domain maximum.
    pub fn bucket_extents(&self, breaks: &[f64], domain: (f64, f64)) -> Vec<(f64, f64)> {
        (0..self.bucket_count())
            .map(|bucket| {
                let lower = bucket
                    .checked_sub(1)
                    .and_then(|i| breaks.get(i))
                    .copied()
                    .unwrap_or(domain.0);
                let upper = breaks.get(bucket).copied().unwrap_or(domain.1);
                (lower, upper)
            })
            .collect()
    }
}

/// Evenly stepped values from `start` (inclusive) towards `stop` (exclusive).
pub fn stepped_range(start: f64, stop: f64, step: f64) -> Vec<f64> {
    if step == 0.0 || !step.is_finite() {
        return Vec::new();
    }
    let count = ((stop - start) / step).ceil();
    if !(count > 0.0) {
        return Vec::new();
    }
    (0..count as usize)
        .map(|i| start + i as f64 * step)
        .collect()
}

/// The fixed scale for the education map: [`EDUCATION_DOMAIN`] cut into
/// [`EDUCATION_STEPS`] steps, keeping only as many thresholds as the palette
/// can color.
pub fn education_scale() -> Result<ClassificationScale, ConfigurationError> {
    let mut thresholds = education_breaks();
    thresholds.truncate(EDUCATION_PALETTE.len() - 1);
    ClassificationScale::from_hex(thresholds, &EDUCATION_PALETTE, NO_DATA_COLOR)
}

/// All [`EDUCATION_STEPS`] steps of [`EDUCATION_DOMAIN`], before the palette
/// caps them. The legend ticks every one of them.
pub fn education_breaks() -> Vec<f64> {
    let (min, max) = EDUCATION_DOMAIN;
    stepped_range(min, max, (max - min) / EDUCATION_STEPS as f64)
}

/// Linear value → pixel mapping for the legend, rounded to whole pixels.
///
/// `ticks` are the break values drawn on the axis; when empty the legend
/// falls back to the scale's thresholds.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendAxis {
    domain: (f64, f64),
    range: (f64, f64),
    ticks: Vec<f64>,
}

impl LegendAxis {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Result<Self, ConfigurationError> {
        if !(domain.0 < domain.1) || !domain.0.is_finite() || !domain.1.is_finite() {
            return Err(ConfigurationError::InvalidDomain {
                min: domain.0,
                max: domain.1,
            });
        }
        Ok(Self {
            domain,
            range,
            ticks: Vec::new(),
        })
    }

    pub fn with_ticks(mut self, ticks: Vec<f64>) -> Self {
        self.ticks = ticks;
        self
    }

    pub fn education() -> Result<Self, ConfigurationError> {
        Ok(Self::new(EDUCATION_DOMAIN, LEGEND_RANGE)?.with_ticks(education_breaks()))
    }

    pub fn ticks(&self) -> &[f64] {
        &self.ticks
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn position(&self, value: f64) -> f64 {
        let t = (value - self.domain.0) / (self.domain.1 - self.domain.0);
        (self.range.0 + t * (self.range.1 - self.range.0)).round()
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ClassificationScale, ConfigurationError, EDUCATION_DOMAIN, LegendAxis, education_scale,
        stepped_range,
    };
    use crate::colors::Rgb;

    fn four_bucket_scale() -> ClassificationScale {
        ClassificationScale::new(
            vec![10.0, 20.0, 30.0],
            vec![Rgb(0, 0, 0), Rgb(1, 1, 1), Rgb(2, 2, 2), Rgb(3, 3, 3)],
            Rgb(9, 9, 9),
        )
        .expect("valid scale")
    }

    #[test]
    fn classify_below_between_and_above() {
        let scale = four_bucket_scale();
        assert_eq!(scale.classify(-5.0), 0);
        assert_eq!(scale.classify(15.0), 1);
        assert_eq!(scale.classify(25.0), 2);
        assert_eq!(scale.classify(50.0), 3);
        assert_eq!(scale.color_for(50.0), Rgb(3, 3, 3));
    }

    #[test]
    fn threshold_value_belongs_to_the_upper_bucket() {
        let scale = four_bucket_scale();
        for (i, &t) in scale.thresholds().iter().enumerate() {
            assert_eq!(scale.classify(t), i + 1, "value exactly at threshold {t}");
            assert_eq!(scale.classify(t - 1e-9), i, "value just below threshold {t}");
        }
    }

    #[test]
    fn classify_is_monotonic() {
        let scale = education_scale().expect("education scale");
        let mut previous = 0;
        for step in 0..=1000 {
            let value = -10.0 + step as f64 * 0.1;
            let bucket = scale.classify(value);
            assert!(bucket >= previous, "bucket decreased at {value}");
            previous = bucket;
        }
        assert_eq!(previous, scale.bucket_count() - 1);
    }

    #[test]
    fn nan_lands_in_the_first_bucket() {
        assert_eq!(four_bucket_scale().classify(f64::NAN), 0);
    }

    #[test]
    fn rejects_empty_thresholds() {
        let err = ClassificationScale::new(vec![], vec![Rgb(0, 0, 0)], Rgb(1, 1, 1)).unwrap_err();
        assert_eq!(err, ConfigurationError::EmptyThresholds);
    }

    #[test]
    fn rejects_non_increasing_thresholds() {
        let palette = vec![Rgb(0, 0, 0), Rgb(1, 1, 1), Rgb(2, 2, 2)];
        let err = ClassificationScale::new(vec![5.0, 5.0], palette.clone(), Rgb(9, 9, 9))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::NotIncreasing {
                index: 1,
                previous: 5.0,
                value: 5.0
            }
        );

        let err = ClassificationScale::new(vec![5.0, 1.0], palette, Rgb(9, 9, 9)).unwrap_err();
        assert!(matches!(err, ConfigurationError::NotIncreasing { index: 1, .. }));
    }

    #[test]
    fn rejects_non_finite_thresholds() {
        let err = ClassificationScale::new(
            vec![1.0, f64::INFINITY],
            vec![Rgb(0, 0, 0), Rgb(1, 1, 1), Rgb(2, 2, 2)],
            Rgb(9, 9, 9),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigurationError::NonFiniteThreshold { index: 1, .. }));
    }

    #[test]
    fn rejects_palette_size_mismatch() {
        let err = ClassificationScale::new(vec![1.0, 2.0], vec![Rgb(0, 0, 0)], Rgb(9, 9, 9))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::PaletteSize {
                thresholds: 2,
                colors: 1
            }
        );
        assert_eq!(err.to_string(), "2 thresholds need 3 colors, palette has 1");
    }

    #[test]
    fn rejects_fallback_inside_palette() {
        let err = ClassificationScale::from_hex(vec![1.0], &["#000", "#ccc"], "#cccccc")
            .unwrap_err();
        assert_eq!(err, ConfigurationError::FallbackInPalette(Rgb(0xcc, 0xcc, 0xcc)));
    }

    #[test]
    fn rejects_bad_hex() {
        let err = ClassificationScale::from_hex(vec![1.0], &["#000", "blue"], "#ccc")
            .unwrap_err();
        assert_eq!(err, ConfigurationError::InvalidColor("blue".to_string()));
    }

    #[test]
    fn stepped_range_excludes_stop() {
        assert_eq!(stepped_range(0.0, 1.0, 0.25), vec![0.0, 0.25, 0.5, 0.75]);
        assert_eq!(stepped_range(0.0, 1.0, 0.3), vec![0.0, 0.3, 0.6, 0.8999999999999999]);
        assert!(stepped_range(1.0, 0.0, 0.5).is_empty());
        assert!(stepped_range(0.0, 1.0, 0.0).is_empty());
    }

    #[test]
    fn education_scale_uses_one_threshold_per_palette_gap() {
        let scale = education_scale().expect("education scale");
        assert_eq!(scale.bucket_count(), 7);
        assert_eq!(scale.thresholds().len(), 6);
        assert_eq!(scale.thresholds()[0], 2.6);

        let step = (EDUCATION_DOMAIN.1 - EDUCATION_DOMAIN.0) / 8.0;
        for pair in scale.thresholds().windows(2) {
            assert!((pair[1] - pair[0] - step).abs() < 1e-9);
        }
        assert_eq!(scale.fallback(), Rgb(0xcc, 0xcc, 0xcc));
    }

    #[test]
    fn bucket_extents_cover_the_domain_without_gaps() {
        let scale = four_bucket_scale();
        let extents = scale.bucket_extents(scale.thresholds(), (0.0, 40.0));
        assert_eq!(
            extents,
            vec![(0.0, 10.0), (10.0, 20.0), (20.0, 30.0), (30.0, 40.0)]
        );
    }

    #[test]
    fn education_legend_extents_follow_the_full_break_list() {
        let scale = education_scale().expect("education scale");
        let axis = LegendAxis::education().expect("education axis");
        assert_eq!(axis.ticks().len(), 8);
        assert_eq!(&axis.ticks()[..6], scale.thresholds());

        let extents = scale.bucket_extents(axis.ticks(), axis.domain());
        assert_eq!(extents.len(), 7);
        // The first swatch collapses onto the lowest break.
        assert_eq!(extents[0], (2.6, 2.6));
        assert_eq!(extents[1], (2.6, scale.thresholds()[1]));
        // The last swatch stops at the seventh break, not at the domain end.
        assert_eq!(extents[6], (axis.ticks()[5], axis.ticks()[6]));
        assert!((extents[6].1 - 56.975).abs() < 1e-9);
    }

    #[test]
    fn legend_axis_rounds_to_pixels() {
        let axis = LegendAxis::education().expect("education axis");
        assert_eq!(axis.position(2.6), 600.0);
        assert_eq!(axis.position(75.1), 860.0);
        // 11.6625 sits one eighth of the way along a 260px axis.
        assert_eq!(axis.position(11.6625), 633.0);
    }

    #[test]
    fn legend_axis_rejects_inverted_domain() {
        let err = LegendAxis::new((5.0, 5.0), (0.0, 1.0)).unwrap_err();
        assert_eq!(err, ConfigurationError::InvalidDomain { min: 5.0, max: 5.0 });
    }
}
