//! Genome features and the feature index.
//!
//! A [`Feature`] is one annotated interval on a sequence (a gene, an mRNA, an
//! exon, ...). Features form trees through their children. A
//! [`FeatureIndex`] keeps the top-level features of every sequence in the
//! order they were added.

use std::{fmt, str::FromStr};

use indexmap::IndexMap;

use crate::range::Range;

/// The strand a feature is located on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Strand {
    /// `+`
    Forward,
    /// `-`
    Reverse,
    /// `.`, not stranded
    #[default]
    Both,
    /// `?`, stranded but unknown
    Unknown,
}

impl Strand {
    pub fn as_char(self) -> char {
        match self {
            Self::Forward => '+',
            Self::Reverse => '-',
            Self::Both => '.',
            Self::Unknown => '?',
        }
    }
}

impl FromStr for Strand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Self::Forward),
            "-" => Ok(Self::Reverse),
            "." => Ok(Self::Both),
            "?" => Ok(Self::Unknown),
            _ => Err(format!("invalid strand `{s}`, expected one of `+`, `-`, `.`, `?`")),
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A single annotated feature and its children.
///
/// # Examples
///
/// ```
/// use annosketch_core::{feature::{Feature, Strand}, range::Range};
///
/// let mut gene = Feature::new("chr1", "gene", Range::new(100, 900).unwrap());
/// gene.set_strand(Strand::Forward);
/// gene.set_attribute("ID", "gene1");
/// gene.add_child(Feature::new("chr1", "exon", Range::new(100, 200).unwrap()));
///
/// assert_eq!(gene.caption(), Some("gene1"));
/// assert_eq!(gene.children().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    seqid: String,
    source: String,
    kind: String,
    range: Range,
    score: Option<f64>,
    strand: Strand,
    phase: Option<u8>,
    attributes: IndexMap<String, String>,
    children: Vec<Feature>,
}

impl Feature {
    /// Creates a feature with no source, score, phase or attributes.
    pub fn new(seqid: impl Into<String>, kind: impl Into<String>, range: Range) -> Self {
        Self {
            seqid: seqid.into(),
            source: String::from("."),
            kind: kind.into(),
            range,
            score: None,
            strand: Strand::default(),
            phase: None,
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    pub fn seqid(&self) -> &str {
        &self.seqid
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// The feature type (GFF3 column 3).
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn range(&self) -> Range {
        self.range
    }

    pub fn score(&self) -> Option<f64> {
        self.score
    }

    pub fn strand(&self) -> Strand {
        self.strand
    }

    pub fn phase(&self) -> Option<u8> {
        self.phase
    }

    pub fn attributes(&self) -> &IndexMap<String, String> {
        &self.attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn children(&self) -> &[Feature] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut [Feature] {
        &mut self.children
    }

    /// The `ID` attribute, if any.
    pub fn id(&self) -> Option<&str> {
        self.attribute("ID")
    }

    /// The `Name` attribute, if any.
    pub fn name(&self) -> Option<&str> {
        self.attribute("Name")
    }

    /// The text shown next to the feature: its name, falling back to its ID.
    pub fn caption(&self) -> Option<&str> {
        self.name().or_else(|| self.id())
    }

    pub fn set_source(&mut self, source: impl Into<String>) {
        self.source = source.into();
    }

    pub fn set_score(&mut self, score: Option<f64>) {
        self.score = score;
    }

    pub fn set_strand(&mut self, strand: Strand) {
        self.strand = strand;
    }

    pub fn set_phase(&mut self, phase: Option<u8>) {
        self.phase = phase;
    }

    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    pub fn add_child(&mut self, child: Feature) {
        self.children.push(child);
    }

    /// Collects the descendants that have no children themselves.
    ///
    /// A feature without children yields nothing.
    pub fn leaves(&self) -> Vec<&Feature> {
        let mut leaves = Vec::new();
        let mut stack: Vec<&Feature> = self.children.iter().rev().collect();
        while let Some(node) = stack.pop() {
            if node.children.is_empty() {
                leaves.push(node);
            } else {
                stack.extend(node.children.iter().rev());
            }
        }
        leaves
    }
}

/// Top-level features grouped by sequence id.
///
/// Sequence regions declared explicitly (GFF3 `##sequence-region`) are kept
/// alongside and take precedence over the span of the features in
/// [`FeatureIndex::region`].
#[derive(Debug, Clone, Default)]
pub struct FeatureIndex {
    features: IndexMap<String, Vec<Feature>>,
    regions: IndexMap<String, Range>,
}

impl FeatureIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a top-level feature under its sequence id.
    pub fn add(&mut self, feature: Feature) {
        self.features
            .entry(feature.seqid().to_string())
            .or_default()
            .push(feature);
    }

    /// Declares the extent of a sequence.
    pub fn set_sequence_region(&mut self, seqid: impl Into<String>, range: Range) {
        self.regions.insert(seqid.into(), range);
    }

    /// Appends every feature of `other`, keeping the order of both indexes.
    pub fn extend(&mut self, other: FeatureIndex) {
        for (_, features) in other.features {
            for feature in features {
                self.add(feature);
            }
        }
        for (seqid, range) in other.regions {
            let merged = match self.regions.get(&seqid) {
                Some(existing) => existing.join(range),
                None => range,
            };
            self.regions.insert(seqid, merged);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Sequence ids in order of first appearance.
    pub fn seqids(&self) -> impl Iterator<Item = &str> {
        self.features.keys().map(String::as_str)
    }

    pub fn first_seqid(&self) -> Option<&str> {
        self.seqids().next()
    }

    pub fn has_seqid(&self, seqid: &str) -> bool {
        self.features.contains_key(seqid)
    }

    /// Top-level features of `seqid`, empty if the sequence is unknown.
    pub fn features(&self, seqid: &str) -> &[Feature] {
        self.features.get(seqid).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Top-level features of `seqid` overlapping `range`.
    pub fn overlapping(&self, seqid: &str, range: Range) -> impl Iterator<Item = &Feature> {
        self.features(seqid)
            .iter()
            .filter(move |feature| feature.range().overlaps(range))
    }

    /// The range spanned by all top-level features of `seqid`.
    pub fn range_of(&self, seqid: &str) -> Option<Range> {
        self.features(seqid)
            .iter()
            .map(Feature::range)
            .reduce(Range::join)
    }

    /// The declared sequence region of `seqid`, falling back to the span of
    /// its features.
    pub fn region(&self, seqid: &str) -> Option<Range> {
        self.regions
            .get(seqid)
            .copied()
            .or_else(|| self.range_of(seqid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: u64, end: u64) -> Range {
        Range::new(start, end).unwrap()
    }

    #[test]
    fn test_strand_from_str_roundtrip() {
        for s in ["+", "-", ".", "?"] {
            let strand: Strand = s.parse().unwrap();
            assert_eq!(strand.to_string(), s);
        }
        assert!("x".parse::<Strand>().is_err());
    }

    #[test]
    fn test_caption_prefers_name() {
        let mut feature = Feature::new("chr1", "gene", range(1, 10));
        assert_eq!(feature.caption(), None);

        feature.set_attribute("ID", "g1");
        assert_eq!(feature.caption(), Some("g1"));

        feature.set_attribute("Name", "BRCA2");
        assert_eq!(feature.caption(), Some("BRCA2"));
    }

    #[test]
    fn test_leaves_in_document_order() {
        let mut gene = Feature::new("chr1", "gene", range(1, 100));
        let mut mrna = Feature::new("chr1", "mRNA", range(1, 100));
        mrna.add_child(Feature::new("chr1", "exon", range(1, 20)));
        mrna.add_child(Feature::new("chr1", "exon", range(50, 100)));
        gene.add_child(mrna);
        gene.add_child(Feature::new("chr1", "repeat", range(30, 40)));

        let leaves: Vec<_> = gene.leaves().iter().map(|f| f.range().start()).collect();
        assert_eq!(leaves, vec![1, 50, 30]);
    }

    #[test]
    fn test_index_groups_by_seqid() {
        let mut index = FeatureIndex::new();
        index.add(Feature::new("chr2", "gene", range(5, 10)));
        index.add(Feature::new("chr1", "gene", range(1, 10)));
        index.add(Feature::new("chr2", "gene", range(40, 80)));

        let seqids: Vec<_> = index.seqids().collect();
        assert_eq!(seqids, vec!["chr2", "chr1"]);
        assert_eq!(index.features("chr2").len(), 2);
        assert!(index.features("chrX").is_empty());
        assert_eq!(index.range_of("chr2"), Some(range(5, 80)));
        assert_eq!(index.range_of("chrX"), None);
    }

    #[test]
    fn test_index_region_prefers_declared() {
        let mut index = FeatureIndex::new();
        index.add(Feature::new("chr1", "gene", range(100, 200)));
        assert_eq!(index.region("chr1"), Some(range(100, 200)));

        index.set_sequence_region("chr1", range(1, 5000));
        assert_eq!(index.region("chr1"), Some(range(1, 5000)));
        assert_eq!(index.range_of("chr1"), Some(range(100, 200)));
    }

    #[test]
    fn test_index_extend_merges_regions() {
        let mut a = FeatureIndex::new();
        a.set_sequence_region("chr1", range(1, 100));
        let mut b = FeatureIndex::new();
        b.set_sequence_region("chr1", range(50, 300));
        b.add(Feature::new("chr1", "gene", range(60, 70)));

        a.extend(b);
        assert_eq!(a.region("chr1"), Some(range(1, 300)));
        assert_eq!(a.features("chr1").len(), 1);
    }

    #[test]
    fn test_index_overlapping() {
        let mut index = FeatureIndex::new();
        index.add(Feature::new("chr1", "gene", range(1, 10)));
        index.add(Feature::new("chr1", "gene", range(20, 30)));

        let hits: Vec<_> = index.overlapping("chr1", range(8, 19)).collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].range(), range(1, 10));
    }
}
