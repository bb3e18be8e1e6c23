//! Diagrams: the features of one sequence region, grouped for drawing.
//!
//! A [`Diagram`] is built from a [`FeatureIndex`]. Every top-level feature
//! overlapping the requested range becomes a [`Block`]; the drawable parts of
//! the feature become the block's [`Element`]s. Blocks are grouped into
//! tracks keyed by feature type, in the order the types first appear.

use indexmap::IndexMap;
use log::{debug, trace};

use annosketch_core::{
    feature::{Feature, FeatureIndex, Strand},
    range::Range,
    style::Style,
};

use crate::error::LayoutError;

/// One drawable part of a block, such as an exon or a CDS segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    kind: String,
    range: Range,
    strand: Strand,
}

impl Element {
    fn from_feature(feature: &Feature) -> Self {
        Self {
            kind: feature.kind().to_string(),
            range: feature.range(),
            strand: feature.strand(),
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn range(&self) -> Range {
        self.range
    }

    pub fn strand(&self) -> Strand {
        self.strand
    }
}

/// A top-level feature ready to be placed on a line.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    caption: Option<String>,
    kind: String,
    strand: Strand,
    range: Range,
    elements: Vec<Element>,
}

impl Block {
    /// Builds a block from a feature tree. Leaves become elements; a feature
    /// without children is its own single element.
    pub fn from_feature(feature: &Feature, with_caption: bool) -> Self {
        let leaves = feature.leaves();
        let elements = if leaves.is_empty() {
            vec![Element::from_feature(feature)]
        } else {
            leaves.into_iter().map(Element::from_feature).collect()
        };

        Self {
            caption: with_caption
                .then(|| feature.caption().map(str::to_string))
                .flatten(),
            kind: feature.kind().to_string(),
            strand: feature.strand(),
            range: feature.range(),
            elements,
        }
    }

    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn strand(&self) -> Strand {
        self.strand
    }

    pub fn range(&self) -> Range {
        self.range
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }
}

/// The blocks of one sequence region, grouped into tracks by feature type.
///
/// # Examples
///
/// ```
/// use annosketch::diagram::Diagram;
/// use annosketch_core::{feature::{Feature, FeatureIndex}, range::Range, style::Style};
///
/// let mut index = FeatureIndex::new();
/// index.add(Feature::new("chr1", "gene", Range::new(100, 500).unwrap()));
/// index.add(Feature::new("chr1", "repeat_region", Range::new(600, 700).unwrap()));
/// index.add(Feature::new("chr1", "gene", Range::new(900, 1200).unwrap()));
///
/// let diagram = Diagram::new(&index, "chr1", Range::new(1, 1000).unwrap(), &Style::default())
///     .unwrap();
/// assert_eq!(diagram.number_of_tracks(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Diagram {
    seqid: String,
    range: Range,
    tracks: IndexMap<String, Vec<Block>>,
}

impl Diagram {
    /// Selects the features of `seqid` overlapping `range`.
    ///
    /// Block captions are left out when the style hides them.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnknownSeqid`] if the index has no features on
    /// `seqid`.
    pub fn new(
        index: &FeatureIndex,
        seqid: &str,
        range: Range,
        style: &Style,
    ) -> Result<Self, LayoutError> {
        if !index.has_seqid(seqid) {
            return Err(LayoutError::UnknownSeqid {
                seqid: seqid.to_string(),
            });
        }

        let with_captions = style.format().show_block_captions();
        let mut tracks: IndexMap<String, Vec<Block>> = IndexMap::new();
        for feature in index.overlapping(seqid, range) {
            trace!(kind = feature.kind(), range:% = feature.range(); "Adding block");
            tracks
                .entry(feature.kind().to_string())
                .or_default()
                .push(Block::from_feature(feature, with_captions));
        }

        debug!(seqid, range:% = range, tracks = tracks.len(); "Diagram built");
        Ok(Self {
            seqid: seqid.to_string(),
            range,
            tracks,
        })
    }

    pub fn seqid(&self) -> &str {
        &self.seqid
    }

    /// The sequence range shown by the diagram.
    pub fn range(&self) -> Range {
        self.range
    }

    /// Tracks as `(feature type, blocks)` pairs.
    pub fn tracks(&self) -> impl Iterator<Item = (&str, &[Block])> {
        self.tracks
            .iter()
            .map(|(kind, blocks)| (kind.as_str(), blocks.as_slice()))
    }

    pub fn number_of_tracks(&self) -> usize {
        self.tracks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: u64, end: u64) -> Range {
        Range::new(start, end).unwrap()
    }

    fn gene_with_exons() -> Feature {
        let mut gene = Feature::new("c", "gene", range(100, 900));
        gene.set_attribute("ID", "g1");
        gene.set_strand(Strand::Reverse);
        let mut mrna = Feature::new("c", "mRNA", range(100, 900));
        mrna.add_child(Feature::new("c", "exon", range(100, 300)));
        mrna.add_child(Feature::new("c", "exon", range(700, 900)));
        gene.add_child(mrna);
        gene
    }

    #[test]
    fn test_block_elements_are_leaves() {
        let block = Block::from_feature(&gene_with_exons(), true);
        assert_eq!(block.caption(), Some("g1"));
        assert_eq!(block.strand(), Strand::Reverse);
        let kinds: Vec<_> = block.elements().iter().map(Element::kind).collect();
        assert_eq!(kinds, vec!["exon", "exon"]);
    }

    #[test]
    fn test_childless_block_is_its_own_element() {
        let block = Block::from_feature(&Feature::new("c", "repeat", range(5, 9)), true);
        assert_eq!(block.caption(), None);
        assert_eq!(block.elements().len(), 1);
        assert_eq!(block.elements()[0].range(), range(5, 9));
    }

    #[test]
    fn test_captions_follow_style() {
        let mut index = FeatureIndex::new();
        index.add(gene_with_exons());
        let mut style = Style::default();
        style.format_mut().set_show_block_captions(false);

        let diagram = Diagram::new(&index, "c", range(1, 1000), &style).unwrap();
        let (_, blocks) = diagram.tracks().next().unwrap();
        assert_eq!(blocks[0].caption(), None);
    }

    #[test]
    fn test_tracks_in_order_of_first_appearance() {
        let mut index = FeatureIndex::new();
        index.add(Feature::new("c", "repeat", range(1, 10)));
        index.add(gene_with_exons());
        index.add(Feature::new("c", "repeat", range(950, 990)));
        index.add(Feature::new("c", "gene", range(5000, 6000)));

        let diagram = Diagram::new(&index, "c", range(1, 1000), &Style::default()).unwrap();
        let tracks: Vec<_> = diagram
            .tracks()
            .map(|(kind, blocks)| (kind, blocks.len()))
            .collect();
        assert_eq!(tracks, vec![("repeat", 2), ("gene", 1)]);
        assert_eq!(diagram.seqid(), "c");
        assert_eq!(diagram.range(), range(1, 1000));
    }

    #[test]
    fn test_unknown_seqid() {
        let index = FeatureIndex::new();
        let err = Diagram::new(&index, "nope", range(1, 10), &Style::default()).unwrap_err();
        assert!(matches!(err, LayoutError::UnknownSeqid { seqid } if seqid == "nope"));
    }
}
