//! Left outer join of regions against statistics, with classification.

use std::collections::HashMap;

use crate::colors::Rgb;
use crate::region::{Region, RegionId};
use crate::scale::ClassificationScale;
use crate::stats::{RegionLabel, StatRecord};

/// Identifier → record lookup, built once from the statistics list.
///
/// When an identifier repeats, the later record replaces the earlier one and
/// the identifier is remembered in [`StatIndex::duplicates`].
#[derive(Debug)]
pub struct StatIndex<'a> {
    records: HashMap<&'a RegionId, &'a StatRecord>,
    duplicates: Vec<RegionId>,
}

impl<'a> StatIndex<'a> {
    pub fn build(stats: &'a [StatRecord]) -> Self {
        let mut records = HashMap::with_capacity(stats.len());
        let mut duplicates = Vec::new();
        for record in stats {
            if records.insert(&record.id, record).is_some() {
                duplicates.push(record.id.clone());
            }
        }
        Self {
            records,
            duplicates,
        }
    }

    pub fn get(&self, id: &RegionId) -> StatMatch<'a> {
        match self.records.get(id) {
            Some(&record) => StatMatch::Found(record),
            None => StatMatch::NotFound,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Identifiers that appeared more than once, once per extra occurrence.
    pub fn duplicates(&self) -> &[RegionId] {
        &self.duplicates
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatMatch<'a> {
    Found(&'a StatRecord),
    NotFound,
}

/// One region of the joined view, ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedRegion<'a> {
    pub region: &'a Region,
    pub stat: StatMatch<'a>,
    pub fill: Rgb,
}

impl JoinedRegion<'_> {
    pub fn id(&self) -> &RegionId {
        &self.region.id
    }

    /// The statistic, or `0.0` when the region has no record.
    pub fn metric(&self) -> f64 {
        match self.stat {
            StatMatch::Found(record) => record.metric,
            StatMatch::NotFound => 0.0,
        }
    }

    pub fn label(&self) -> Option<RegionLabel> {
        match self.stat {
            StatMatch::Found(record) => Some(record.label()),
            StatMatch::NotFound => None,
        }
    }

    pub fn is_matched(&self) -> bool {
        matches!(self.stat, StatMatch::Found(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JoinedView<'a> {
    pub regions: Vec<JoinedRegion<'a>>,
    /// Statistic ids that occurred more than once; the last occurrence won.
    pub duplicates: Vec<RegionId>,
}

impl<'a> JoinedView<'a> {
    pub fn matched(&self) -> usize {
        self.regions.iter().filter(|r| r.is_matched()).count()
    }

    pub fn unmatched(&self) -> usize {
        self.regions.len() - self.matched()
    }

    /// Tooltip text for `id`. `None` both for unknown ids and for regions
    /// without a statistic.
    pub fn label_for(&self, id: &RegionId) -> Option<RegionLabel> {
        self.get(id).and_then(JoinedRegion::label)
    }

    pub fn get(&self, id: &RegionId) -> Option<&JoinedRegion<'a>> {
        self.regions.iter().find(|r| r.id() == id)
    }
}

/// Join every region to its statistic, in region order, and pick its fill.
///
/// Regions without a statistic keep their place and get the scale's fallback
/// color.
pub fn join<'a>(
    regions: &'a [Region],
    stats: &'a [StatRecord],
    scale: &ClassificationScale,
) -> JoinedView<'a> {
    let index = StatIndex::build(stats);
    let joined = regions
        .iter()
        .map(|region| {
            let stat = index.get(&region.id);
            let fill = match stat {
                StatMatch::Found(record) => scale.color_for(record.metric),
                StatMatch::NotFound => scale.fallback(),
            };
            JoinedRegion { region, stat, fill }
        })
        .collect();

    JoinedView {
        regions: joined,
        duplicates: index.duplicates,
    }
}
