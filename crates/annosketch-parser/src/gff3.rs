//! GFF3 reader.
//!
//! Reads the feature section of a GFF3 file into a [`FeatureIndex`]:
//!
//! 1. **Lines** - comments are skipped, `##sequence-region` directives are
//!    recorded, `##FASTA` ends the feature section.
//! 2. **Columns** - each feature line is split into its nine columns and
//!    every column is checked; all problems are collected before failing.
//! 3. **Relations** - `Parent` attributes attach features to the features
//!    carrying the matching `ID`, building one tree per top-level feature.

use std::collections::HashMap;

use log::{debug, trace};
use winnow::{
    Parser as _,
    combinator::{opt, separated, separated_pair, terminated},
    error::ModalResult,
    token::take_till,
};

use annosketch_core::{
    feature::{Feature, FeatureIndex, Strand},
    range::Range,
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    span::Span,
};

const COLUMN_COUNT: usize = 9;

/// Largest accepted coordinate, the signed 64-bit limit other GFF3 tools use.
pub const MAX_COORDINATE: u64 = i64::MAX as u64;

/// One feature line, before relations are resolved.
struct Record {
    feature: Feature,
    id_span: Option<Span>,
    parents: Vec<(String, Span)>,
}

/// Parse GFF3 text into a feature index.
///
/// # Errors
///
/// Returns a [`ParseError`] with one diagnostic per problem found.
///
/// # Example
///
/// ```
/// # use annosketch_parser::gff3;
/// let source = "##gff-version 3\n\
///     chr1\t.\tgene\t100\t900\t.\t+\t.\tID=g1;Name=alpha\n\
///     chr1\t.\texon\t100\t300\t.\t+\t.\tParent=g1\n";
///
/// let index = gff3::parse(source).unwrap();
/// let gene = &index.features("chr1")[0];
/// assert_eq!(gene.caption(), Some("alpha"));
/// assert_eq!(gene.children().len(), 1);
/// ```
pub fn parse(source: &str) -> Result<FeatureIndex, ParseError> {
    let mut collector = DiagnosticCollector::new();
    let mut index = FeatureIndex::new();
    let mut records = Vec::new();

    for line in lines(source) {
        if line.is_empty() {
            continue;
        }
        if line.starts_with("##FASTA") {
            debug!("Reached embedded FASTA section");
            break;
        }
        if let Some(directive) = line.strip_prefix("##sequence-region") {
            parse_sequence_region(source, directive, &mut index, &mut collector);
            continue;
        }
        if line.starts_with('#') {
            continue;
        }
        if let Some(record) = parse_line(source, line, &mut collector) {
            records.push(record);
        }
    }

    link_records(records, &mut index, &mut collector);
    collector.finish()?;

    debug!(seqids = index.seqids().count(); "GFF3 parsed");
    Ok(index)
}

/// Lines of `source` without their terminators, as subslices of `source`.
fn lines(source: &str) -> impl Iterator<Item = &str> {
    source
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
}

fn parse_sequence_region(
    source: &str,
    directive: &str,
    index: &mut FeatureIndex,
    collector: &mut DiagnosticCollector,
) {
    let parts: Vec<&str> = directive.split_whitespace().collect();
    let region = match parts.as_slice() {
        [seqid, start, end] => region_bound(start)
            .zip(region_bound(end))
            .and_then(|(start, end)| Range::new(start, end).ok())
            .map(|range| (*seqid, range)),
        _ => None,
    };

    match region {
        Some((seqid, range)) => index.set_sequence_region(seqid, range),
        None => collector.emit(
            Diagnostic::warning("ignoring malformed `##sequence-region` directive")
                .with_label(Span::of_subslice(source, directive), "expected `seqid start end`"),
        ),
    }
}

fn region_bound(value: &str) -> Option<u64> {
    value
        .parse::<u64>()
        .ok()
        .filter(|position| (1..=MAX_COORDINATE).contains(position))
}

fn parse_line(source: &str, line: &str, collector: &mut DiagnosticCollector) -> Option<Record> {
    let columns: Vec<&str> = line.split('\t').collect();
    if columns.len() != COLUMN_COUNT {
        collector.emit(
            Diagnostic::error(format!(
                "expected {COLUMN_COUNT} tab-separated columns, found {}",
                columns.len()
            ))
            .with_code(ErrorCode::E100)
            .with_label(Span::of_subslice(source, line), "feature line"),
        );
        return None;
    }

    let span = |column: &str| Span::of_subslice(source, column);
    let mut line_ok = true;

    let start = parse_coordinate(columns[3], span(columns[3]), collector);
    let end = parse_coordinate(columns[4], span(columns[4]), collector);
    let range = match (start, end) {
        (Some(start), Some(end)) => match Range::new(start, end) {
            Ok(range) => Some(range),
            Err(message) => {
                collector.emit(
                    Diagnostic::error(message)
                        .with_code(ErrorCode::E102)
                        .with_label(span(columns[3]), "start")
                        .with_secondary_label(span(columns[4]), "end")
                        .with_help("GFF3 coordinates are 1-based with start <= end"),
                );
                None
            }
        },
        _ => None,
    };

    let score = match columns[5] {
        "." => None,
        value => match value.parse::<f64>() {
            Ok(score) => Some(score),
            Err(_) => {
                collector.emit(
                    Diagnostic::error(format!("invalid score `{value}`"))
                        .with_code(ErrorCode::E104)
                        .with_label(span(value), "expected `.` or a number"),
                );
                line_ok = false;
                None
            }
        },
    };

    let strand = match columns[6].parse::<Strand>() {
        Ok(strand) => strand,
        Err(message) => {
            collector.emit(
                Diagnostic::error(message)
                    .with_code(ErrorCode::E103)
                    .with_label(span(columns[6]), "invalid strand"),
            );
            line_ok = false;
            Strand::default()
        }
    };

    let phase = match columns[7] {
        "." => None,
        "0" => Some(0),
        "1" => Some(1),
        "2" => Some(2),
        value => {
            collector.emit(
                Diagnostic::error(format!("invalid phase `{value}`"))
                    .with_code(ErrorCode::E105)
                    .with_label(span(value), "expected `.`, `0`, `1` or `2`"),
            );
            line_ok = false;
            None
        }
    };

    let attributes = parse_attributes(source, columns[8], collector);

    let (Some(range), Some(attributes)) = (range, attributes) else {
        return None;
    };
    if !line_ok {
        return None;
    }

    let mut feature = Feature::new(columns[0], columns[2], range);
    feature.set_source(columns[1]);
    feature.set_score(score);
    feature.set_strand(strand);
    feature.set_phase(phase);

    let mut id_span = None;
    let mut parents = Vec::new();
    for (key, raw_value, value_span) in attributes {
        let value = unescape(raw_value);
        match key {
            "ID" => id_span = Some(value_span),
            "Parent" => {
                parents.extend(value.split(',').map(|parent| (parent.to_string(), value_span)));
            }
            _ => {}
        }
        feature.set_attribute(key, value);
    }

    trace!(feature:? = feature; "Parsed feature line");
    Some(Record {
        feature,
        id_span,
        parents,
    })
}

fn parse_coordinate(value: &str, span: Span, collector: &mut DiagnosticCollector) -> Option<u64> {
    let label = match value.parse::<u64>() {
        Ok(position @ 1..=MAX_COORDINATE) => return Some(position),
        Ok(0) | Err(_) => "expected a positive integer".to_string(),
        Ok(_) => format!("coordinates are limited to {MAX_COORDINATE}"),
    };
    collector.emit(
        Diagnostic::error(format!("invalid coordinate `{value}`"))
            .with_code(ErrorCode::E101)
            .with_label(span, label),
    );
    None
}

/// A single `key=value` attribute.
fn attribute<'s>(input: &mut &'s str) -> ModalResult<(&'s str, &'s str)> {
    separated_pair(
        take_till(1.., |c: char| c == '=' || c == ';'),
        '=',
        take_till(0.., ';'),
    )
    .parse_next(input)
}

/// `key=value` pairs separated by `;`, with an optional trailing `;`.
fn attribute_list<'s>(input: &mut &'s str) -> ModalResult<Vec<(&'s str, &'s str)>> {
    terminated(separated(1.., attribute, ';'), opt(';')).parse_next(input)
}

/// Parses column 9 into `(key, raw value, value span)` triples.
fn parse_attributes<'s>(
    source: &str,
    column: &'s str,
    collector: &mut DiagnosticCollector,
) -> Option<Vec<(&'s str, &'s str, Span)>> {
    if column == "." || column.is_empty() {
        return Some(Vec::new());
    }

    match attribute_list.parse(column) {
        Ok(pairs) => Some(
            pairs
                .into_iter()
                .map(|(key, value)| (key.trim(), value, Span::of_subslice(source, value)))
                .collect(),
        ),
        Err(err) => {
            let column_span = Span::of_subslice(source, column);
            let at = column_span.start() + err.offset();
            collector.emit(
                Diagnostic::error("malformed attribute column")
                    .with_code(ErrorCode::E106)
                    .with_label(Span::new(at..(at + 1).min(column_span.end())), "expected `key=value`")
                    .with_secondary_label(column_span, "in these attributes")
                    .with_help("separate attributes with `;` and escape `;`, `=` as %3B, %3D"),
            );
            None
        }
    }
}

/// Decodes GFF3 `%XX` escapes; malformed escapes are kept verbatim.
fn unescape(value: &str) -> String {
    if !value.contains('%') {
        return value.to_string();
    }

    let bytes = value.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let high = (bytes[i + 1] as char).to_digit(16);
            let low = (bytes[i + 2] as char).to_digit(16);
            if let (Some(high), Some(low)) = (high, low) {
                decoded.push((high * 16 + low) as u8);
                i += 3;
                continue;
            }
        }
        decoded.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&decoded).into_owned()
}

/// Attaches children to their parents and adds the resulting trees to `index`.
fn link_records(
    records: Vec<Record>,
    index: &mut FeatureIndex,
    collector: &mut DiagnosticCollector,
) {
    let mut ids: HashMap<(&str, &str), usize> = HashMap::new();
    for (position, record) in records.iter().enumerate() {
        let Some(id) = record.feature.id() else {
            continue;
        };
        let key = (record.feature.seqid(), id);
        match ids.get(&key) {
            Some(&first) if records[first].feature.kind() != record.feature.kind() => {
                let mut diag = Diagnostic::error(format!("ID `{id}` is used by features of different types"))
                    .with_code(ErrorCode::E200);
                if let Some(span) = record.id_span {
                    diag = diag.with_label(span, "duplicate ID");
                }
                if let Some(span) = records[first].id_span {
                    diag = diag.with_secondary_label(span, "first used here");
                }
                collector.emit(diag);
            }
            Some(_) => {}
            None => {
                ids.insert(key, position);
            }
        }
    }

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); records.len()];
    let mut roots = Vec::new();
    for (position, record) in records.iter().enumerate() {
        if record.parents.is_empty() {
            roots.push(position);
            continue;
        }
        for (parent, span) in &record.parents {
            let seqid = record.feature.seqid();
            if let Some(&parent_position) = ids.get(&(seqid, parent.as_str())) {
                children[parent_position].push(position);
                continue;
            }
            let elsewhere = records
                .iter()
                .any(|other| other.feature.id() == Some(parent.as_str()));
            let diag = if elsewhere {
                Diagnostic::error(format!("parent `{parent}` is on another sequence than `{seqid}`"))
                    .with_code(ErrorCode::E202)
            } else {
                Diagnostic::error(format!("undefined parent `{parent}`"))
                    .with_code(ErrorCode::E201)
                    .with_help("define the parent with a matching `ID` attribute")
            };
            collector.emit(diag.with_label(*span, "referenced here"));
        }
    }

    if collector.has_errors() {
        return;
    }

    let mut visiting = vec![false; records.len()];
    for root in roots {
        if let Some(tree) = build_tree(root, &records, &children, &mut visiting) {
            index.add(tree);
        }
    }
}

fn build_tree(
    position: usize,
    records: &[Record],
    children: &[Vec<usize>],
    visiting: &mut [bool],
) -> Option<Feature> {
    if visiting[position] {
        return None;
    }
    visiting[position] = true;

    let mut feature = records[position].feature.clone();
    for &child in &children[position] {
        if let Some(subtree) = build_tree(child, records, children, visiting) {
            feature.add_child(subtree);
        }
    }

    visiting[position] = false;
    Some(feature)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_error(source: &str) -> Diagnostic {
        let err = parse(source).unwrap_err();
        err.diagnostics()[0].clone()
    }

    #[test]
    fn test_parse_gene_model() {
        let source = "##gff-version 3\n\
            ##sequence-region ctg1 1 5000\n\
            ctg1\tsrc\tgene\t1000\t4000\t.\t+\t.\tID=gene1;Name=EDEN\n\
            ctg1\tsrc\tmRNA\t1050\t4000\t.\t+\t.\tID=mrna1;Parent=gene1\n\
            ctg1\tsrc\texon\t1050\t1500\t.\t+\t.\tParent=mrna1\n\
            ctg1\tsrc\tCDS\t1201\t1500\t.\t+\t0\tParent=mrna1\n";

        let index = parse(source).unwrap();
        assert_eq!(index.region("ctg1"), Some(Range::new(1, 5000).unwrap()));

        let genes = index.features("ctg1");
        assert_eq!(genes.len(), 1);
        assert_eq!(genes[0].source(), "src");
        assert_eq!(genes[0].strand(), Strand::Forward);

        let mrna = &genes[0].children()[0];
        assert_eq!(mrna.kind(), "mRNA");
        assert_eq!(mrna.children().len(), 2);
        assert_eq!(mrna.children()[1].phase(), Some(0));
    }

    #[test]
    fn test_parse_children_before_parent() {
        let source = "c\t.\texon\t5\t10\t.\t-\t.\tParent=t1\n\
            c\t.\ttranscript\t1\t20\t.\t-\t.\tID=t1\n";

        let index = parse(source).unwrap();
        let features = index.features("c");
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].kind(), "transcript");
        assert_eq!(features[0].children().len(), 1);
    }

    #[test]
    fn test_parse_multiple_parents() {
        let source = "c\t.\tmRNA\t1\t20\t.\t+\t.\tID=a\n\
            c\t.\tmRNA\t1\t30\t.\t+\t.\tID=b\n\
            c\t.\texon\t1\t10\t.\t+\t.\tParent=a,b\n";

        let index = parse(source).unwrap();
        let features = index.features("c");
        assert_eq!(features.len(), 2);
        assert_eq!(features[0].children().len(), 1);
        assert_eq!(features[1].children().len(), 1);
    }

    #[test]
    fn test_parse_stops_at_fasta_section() {
        let source = "c\t.\tgene\t1\t20\t.\t+\t.\tID=a\n##FASTA\n>c\nACGT\n";
        let index = parse(source).unwrap();
        assert_eq!(index.features("c").len(), 1);
    }

    #[test]
    fn test_parse_unescapes_attribute_values() {
        let source = "c\t.\tgene\t1\t20\t.\t+\t.\tID=a;Note=one%3Btwo%2C three\n";
        let index = parse(source).unwrap();
        assert_eq!(index.features("c")[0].attribute("Note"), Some("one;two, three"));
    }

    #[test]
    fn test_parse_score_and_trailing_semicolon() {
        let source = "c\t.\tmatch\t1\t20\t0.5\t.\t.\tID=m1;\n";
        let index = parse(source).unwrap();
        let feature = &index.features("c")[0];
        assert_eq!(feature.score(), Some(0.5));
        assert_eq!(feature.id(), Some("m1"));
    }

    #[test]
    fn test_wrong_column_count() {
        let diag = first_error("c\t.\tgene\t1\t20\n");
        assert_eq!(diag.code(), Some(ErrorCode::E100));
    }

    #[test]
    fn test_invalid_coordinate_span() {
        let source = "c\t.\tgene\tabc\t20\t.\t+\t.\tID=a\n";
        let diag = first_error(source);
        assert_eq!(diag.code(), Some(ErrorCode::E101));
        let span = diag.labels()[0].span();
        assert_eq!(&source[span.start()..span.end()], "abc");
    }

    #[test]
    fn test_coordinate_limit() {
        let source = format!("c\t.\tgene\t100\t{}\t.\t+\t.\tID=g\n", u64::MAX);
        let diag = first_error(&source);
        assert_eq!(diag.code(), Some(ErrorCode::E101));
        assert!(diag.labels()[0].message().contains("limited"));

        let source = format!("c\t.\tgene\t100\t{MAX_COORDINATE}\t.\t+\t.\tID=g\n");
        let index = parse(&source).unwrap();
        assert_eq!(index.features("c")[0].range().end(), MAX_COORDINATE);
    }

    #[test]
    fn test_sequence_region_beyond_limit_is_ignored() {
        let source = format!(
            "##sequence-region c 1 {}\nc\t.\tgene\t10\t20\t.\t+\t.\tID=g\n",
            u64::MAX
        );
        let index = parse(&source).unwrap();
        assert_eq!(index.region("c"), Some(Range::new(10, 20).unwrap()));
    }

    #[test]
    fn test_zero_coordinate_is_invalid() {
        let diag = first_error("c\t.\tgene\t0\t20\t.\t+\t.\t.\n");
        assert_eq!(diag.code(), Some(ErrorCode::E101));
    }

    #[test]
    fn test_start_after_end() {
        let diag = first_error("c\t.\tgene\t30\t20\t.\t+\t.\t.\n");
        assert_eq!(diag.code(), Some(ErrorCode::E102));
        assert_eq!(diag.labels().len(), 2);
    }

    #[test]
    fn test_invalid_strand_phase_and_score() {
        let err = parse("c\t.\tgene\t1\t20\tx\t*\t5\t.\n").unwrap_err();
        let codes: Vec<_> = err.diagnostics().iter().filter_map(Diagnostic::code).collect();
        assert_eq!(codes, vec![ErrorCode::E104, ErrorCode::E103, ErrorCode::E105]);
    }

    #[test]
    fn test_malformed_attributes() {
        let diag = first_error("c\t.\tgene\t1\t20\t.\t+\t.\tID=a;;Name\n");
        assert_eq!(diag.code(), Some(ErrorCode::E106));
    }

    #[test]
    fn test_undefined_parent() {
        let diag = first_error("c\t.\texon\t1\t20\t.\t+\t.\tParent=nope\n");
        assert_eq!(diag.code(), Some(ErrorCode::E201));
    }

    #[test]
    fn test_parent_on_other_sequence() {
        let diag = first_error(
            "c1\t.\tgene\t1\t20\t.\t+\t.\tID=g\nc2\t.\texon\t1\t20\t.\t+\t.\tParent=g\n",
        );
        assert_eq!(diag.code(), Some(ErrorCode::E202));
    }

    #[test]
    fn test_duplicate_id_with_different_type() {
        let diag = first_error(
            "c\t.\tgene\t1\t20\t.\t+\t.\tID=x\nc\t.\tmRNA\t1\t20\t.\t+\t.\tID=x\n",
        );
        assert_eq!(diag.code(), Some(ErrorCode::E200));
        assert_eq!(diag.labels().len(), 2);
    }

    #[test]
    fn test_discontinuous_feature_shares_id() {
        let source = "c\t.\tCDS\t1\t20\t.\t+\t0\tID=cds1\nc\t.\tCDS\t40\t60\t.\t+\t1\tID=cds1\n";
        let index = parse(source).unwrap();
        assert_eq!(index.features("c").len(), 2);
    }

    #[test]
    fn test_all_errors_are_collected() {
        let err = parse("c\t.\tgene\t0\t20\t.\t+\t.\t.\nc\t.\tgene\t1\n").unwrap_err();
        assert_eq!(err.diagnostics().len(), 2);
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape("plain"), "plain");
        assert_eq!(unescape("a%3Db"), "a=b");
        assert_eq!(unescape("100%"), "100%");
        assert_eq!(unescape("%zz"), "%zz");
    }
}
