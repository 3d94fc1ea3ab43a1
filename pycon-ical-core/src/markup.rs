//! Sibling walking inside a talk block.
//!
//! A talk block is a flat run of children: the `h3` title, then subtitle,
//! description and schedule, with whitespace-only text and comments mixed
//! in. Each child is classified into a [`Piece`], and [`step`] decides
//! whether the walk skips it or stops on it.

use scraper::ElementRef;
use scraper::node::Node;
use tracing::trace;

/// One child node of a talk block.
#[derive(Debug, Clone)]
pub enum Piece<'a> {
    Comment,
    Text(&'a str),
    Element(ElementRef<'a>),
    /// Doctype, processing instruction and friends
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Skip(SkipReason),
    Stop(StopReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Comment,
    BlankText,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Element,
    Text,
}

/// Classify the direct children of `parent`, in document order.
pub fn pieces<'a>(parent: ElementRef<'a>) -> Vec<Piece<'a>> {
    parent
        .children()
        .map(|child| match child.value() {
            Node::Comment(_) => Piece::Comment,
            Node::Text(text) => Piece::Text(text),
            Node::Element(_) => ElementRef::wrap(child)
                .map(Piece::Element)
                .unwrap_or(Piece::Other),
            _ => Piece::Other,
        })
        .collect()
}

pub fn step(piece: &Piece<'_>) -> Step {
    match piece {
        Piece::Comment => Step::Skip(SkipReason::Comment),
        Piece::Text(text) if text.trim().is_empty() => Step::Skip(SkipReason::BlankText),
        Piece::Text(_) => Step::Stop(StopReason::Text),
        Piece::Element(_) => Step::Stop(StopReason::Element),
        Piece::Other => Step::Skip(SkipReason::Other),
    }
}

/// Index of the first meaningful piece after `after`, or `None` once the
/// siblings run out.
pub fn next_meaningful(pieces: &[Piece<'_>], after: usize) -> Option<usize> {
    pieces
        .iter()
        .enumerate()
        .skip(after + 1)
        .find_map(|(index, piece)| match step(piece) {
            Step::Stop(_) => Some(index),
            Step::Skip(reason) => {
                trace!(index, ?reason, "Skipping sibling");
                None
            }
        })
}

/// First child element with the given tag name.
pub fn find_child<'a>(pieces: &[Piece<'a>], tag: &str) -> Option<(usize, ElementRef<'a>)> {
    pieces.iter().enumerate().find_map(|(index, piece)| match piece {
        Piece::Element(element) if element.value().name() == tag => Some((index, *element)),
        _ => None,
    })
}

/// Inner text of an element, or the content of a text node.
pub fn text_of(piece: &Piece<'_>) -> String {
    match piece {
        Piece::Text(text) => text.to_string(),
        Piece::Element(element) => element.text().collect(),
        Piece::Comment | Piece::Other => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    #[test]
    fn steps_name_their_reason() {
        assert_eq!(step(&Piece::Comment), Step::Skip(SkipReason::Comment));
        assert_eq!(step(&Piece::Text(" \n\t ")), Step::Skip(SkipReason::BlankText));
        assert_eq!(step(&Piece::Text("")), Step::Skip(SkipReason::BlankText));
        assert_eq!(step(&Piece::Other), Step::Skip(SkipReason::Other));
        assert_eq!(step(&Piece::Text(" Jane ")), Step::Stop(StopReason::Text));
    }

    #[test]
    fn walk_skips_noise_and_stops_on_text() {
        let pieces = [
            Piece::Text("heading"),
            Piece::Text("\n   "),
            Piece::Comment,
            Piece::Other,
            Piece::Text("speaker"),
            Piece::Text("  "),
        ];

        assert_eq!(next_meaningful(&pieces, 0), Some(4));
        assert_eq!(next_meaningful(&pieces, 4), None);
        assert_eq!(next_meaningful(&pieces, 10), None);
    }

    #[test]
    fn walk_over_parsed_markup() {
        let html = Html::parse_fragment(
            "<div id=\"talk\"><h3>Title</h3>\n  <!-- speaker -->\n  <h4>Jane Doe</h4>\n  bare text\n</div>",
        );
        let selector = Selector::parse("#talk").unwrap();
        let block = html.select(&selector).next().unwrap();
        let pieces = pieces(block);

        let (heading, element) = find_child(&pieces, "h3").unwrap();
        assert_eq!(element.text().collect::<String>(), "Title");

        let subtitle = next_meaningful(&pieces, heading).unwrap();
        assert_eq!(step(&pieces[subtitle]), Step::Stop(StopReason::Element));
        assert_eq!(text_of(&pieces[subtitle]), "Jane Doe");

        let trailing = next_meaningful(&pieces, subtitle).unwrap();
        assert_eq!(step(&pieces[trailing]), Step::Stop(StopReason::Text));
        assert_eq!(text_of(&pieces[trailing]).trim(), "bare text");

        assert_eq!(next_meaningful(&pieces, trailing), None);
    }

    #[test]
    fn missing_tag_is_none() {
        let pieces = [Piece::Comment, Piece::Text("x")];
        assert!(find_child(&pieces, "h3").is_none());
        assert_eq!(text_of(&Piece::Comment), "");
    }
}
