// Copyright 2026 The recall Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use regex::Regex;

use crate::annotation::strip_schedules;
use crate::error::Fallible;
use crate::settings::Delimiters;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CardKind {
    SingleLineBasic,
    SingleLineReversed,
    MultiLineBasic,
    MultiLineReversed,
    Cloze,
}

impl CardKind {
    pub fn as_str(&self) -> &str {
        match self {
            CardKind::SingleLineBasic => "single-line",
            CardKind::SingleLineReversed => "single-line-reversed",
            CardKind::MultiLineBasic => "multi-line",
            CardKind::MultiLineReversed => "multi-line-reversed",
            CardKind::Cloze => "cloze",
        }
    }
}

/// A card-shaped block of text found in a document.
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedCard {
    pub kind: CardKind,
    /// The card's text, including any schedule annotation.
    pub text: String,
    /// The line the card is anchored to: the separator line for multi-line
    /// cards, the first cloze line for clozes, the card's own line otherwise.
    pub line_number: usize,
    /// The first line of the card's text.
    pub first_line: usize,
    /// The last line of the card's text.
    pub last_line: usize,
}

pub struct CardParser {
    delimiters: Delimiters,
    cloze_patterns: Vec<Regex>,
}

impl CardParser {
    pub fn new(delimiters: &Delimiters) -> Fallible<Self> {
        Ok(Self {
            delimiters: delimiters.clone(),
            cloze_patterns: delimiters.compile_cloze_patterns()?,
        })
    }

    /// Find every card in `content`, in document order. Line numbers are
    /// 0-based.
    pub fn parse(&self, content: &str) -> Vec<ParsedCard> {
        let content = content.replace("\r\n", "\n");
        let lines: Vec<&str> = content.split('\n').collect();
        let single = self.delimiters.single_line.as_str();
        let single_reversed = self.delimiters.single_line_reversed.as_str();

        let mut cards = Vec::new();
        let mut card_text = String::new();
        let mut kind: Option<CardKind> = None;
        let mut line_number = 0;
        let mut first_line = 0;

        let mut i = 0;
        while i < lines.len() {
            let line = lines[i];
            if line.trim().is_empty() {
                if let Some(kind) = kind.take() {
                    cards.push(ParsedCard {
                        kind,
                        text: card_text.clone(),
                        line_number,
                        first_line,
                        last_line: i - 1,
                    });
                }
                card_text.clear();
                i += 1;
                continue;
            }
            if line.starts_with("<!--") && !line.starts_with("<!--SR:") {
                // Skip the comment, however many lines it spans.
                while i + 1 < lines.len() && !lines[i].contains("-->") {
                    i += 1;
                }
                i += 1;
                continue;
            }

            if card_text.is_empty() {
                first_line = i;
            } else {
                card_text.push('\n');
            }
            card_text.push_str(line);

            if line.contains(single_reversed) || line.contains(single) {
                let kind_here = if line.contains(single_reversed) {
                    CardKind::SingleLineReversed
                } else {
                    CardKind::SingleLineBasic
                };
                let mut text = line.to_string();
                let start = i;
                if i + 1 < lines.len() && lines[i + 1].starts_with("<!--SR:") {
                    text.push('\n');
                    text.push_str(lines[i + 1]);
                    i += 1;
                }
                cards.push(ParsedCard {
                    kind: kind_here,
                    text,
                    line_number: start,
                    first_line: start,
                    last_line: i,
                });
                kind = None;
                card_text.clear();
            } else if kind.is_none() && self.is_cloze_line(line) {
                kind = Some(CardKind::Cloze);
                line_number = i;
            } else if line.trim() == self.delimiters.multi_line {
                kind = Some(CardKind::MultiLineBasic);
                line_number = i;
            } else if line.trim() == self.delimiters.multi_line_reversed {
                kind = Some(CardKind::MultiLineReversed);
                line_number = i;
            } else if line.starts_with("```") || line.starts_with("~~~") {
                let fence_char = line.chars().next().unwrap_or('`');
                let fence: String = line.chars().take_while(|c| *c == fence_char).collect();
                while i + 1 < lines.len() && !lines[i + 1].starts_with(&fence) {
                    i += 1;
                    card_text.push('\n');
                    card_text.push_str(lines[i]);
                }
                card_text.push('\n');
                card_text.push_str(&fence);
                i += 1;
            }
            i += 1;
        }

        if let Some(kind) = kind {
            if !card_text.is_empty() {
                cards.push(ParsedCard {
                    kind,
                    text: card_text,
                    line_number,
                    first_line,
                    last_line: lines.len().saturating_sub(1).min(i),
                });
            }
        }

        cards
    }

    fn is_cloze_line(&self, line: &str) -> bool {
        self.cloze_patterns.iter().any(|re| re.is_match(line))
    }

    /// How many reviewable cards the block stands for. Reversed cards are
    /// reviewed in both directions, and a cloze card holds one card per
    /// deletion.
    pub fn sibling_count(&self, card: &ParsedCard) -> usize {
        match card.kind {
            CardKind::SingleLineReversed | CardKind::MultiLineReversed => 2,
            CardKind::SingleLineBasic | CardKind::MultiLineBasic => 1,
            CardKind::Cloze => {
                let text = strip_schedules(&card.text);
                let deletions: usize = self
                    .cloze_patterns
                    .iter()
                    .map(|re| re.find_iter(&text).count())
                    .sum();
                deletions.max(1)
            }
        }
    }

    /// The prompt and the answer of one sibling of a card.
    pub fn sides(&self, card: &ParsedCard, sibling: usize) -> (String, String) {
        let stripped = strip_schedules(&card.text);
        let text = stripped.trim_end();
        let swap = |(front, back): (String, String)| {
            if sibling % 2 == 1 { (back, front) } else { (front, back) }
        };
        match card.kind {
            CardKind::SingleLineBasic => split_line(text, &self.delimiters.single_line),
            CardKind::SingleLineReversed => {
                swap(split_line(text, &self.delimiters.single_line_reversed))
            }
            CardKind::MultiLineBasic => split_lines(text, &self.delimiters.multi_line),
            CardKind::MultiLineReversed => {
                swap(split_lines(text, &self.delimiters.multi_line_reversed))
            }
            CardKind::Cloze => {
                let mut deletions: Vec<(usize, usize)> = self
                    .cloze_patterns
                    .iter()
                    .flat_map(|re| re.find_iter(text).map(|m| (m.start(), m.end())))
                    .collect();
                deletions.sort();
                let Some((start, end)) = deletions.get(sibling).copied() else {
                    return (text.to_string(), text.to_string());
                };
                let front = format!("{}[...]{}", &text[..start], &text[end..]);
                let back = format!("{}[{}]{}", &text[..start], &text[start..end], &text[end..]);
                (front, back)
            }
        }
    }
}

fn split_line(text: &str, separator: &str) -> (String, String) {
    let line = text.lines().next().unwrap_or("");
    match line.split_once(separator) {
        Some((front, back)) => (front.trim().to_string(), back.trim().to_string()),
        None => (line.to_string(), String::new()),
    }
}

fn split_lines(text: &str, separator: &str) -> (String, String) {
    let lines: Vec<&str> = text.lines().collect();
    match lines.iter().position(|line| line.trim() == separator) {
        Some(index) => (lines[..index].join("\n"), lines[index + 1..].join("\n")),
        None => (text.to_string(), String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Vec<ParsedCard> {
        let parser = CardParser::new(&Delimiters::default()).unwrap();
        parser.parse(content)
    }

    #[test]
    fn test_single_line() {
        let cards = parse("What is the capital of France?::Paris");
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].kind, CardKind::SingleLineBasic);
        assert_eq!(cards[0].text, "What is the capital of France?::Paris");
        assert_eq!(cards[0].line_number, 0);
    }

    #[test]
    fn test_single_line_reversed() {
        let cards = parse("# Capitals\n\nFrance:::Paris");
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].kind, CardKind::SingleLineReversed);
        assert_eq!(cards[0].line_number, 2);
    }

    #[test]
    fn test_single_line_with_annotation_below() {
        let content = "A::B\n<!--SR:!2023-09-02,4,270-->\nC::D";
        let cards = parse(content);
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].text, "A::B\n<!--SR:!2023-09-02,4,270-->");
        assert_eq!(cards[0].first_line, 0);
        assert_eq!(cards[0].last_line, 1);
        assert_eq!(cards[1].text, "C::D");
        assert_eq!(cards[1].line_number, 2);
    }

    #[test]
    fn test_multi_line() {
        let content = "intro\n\nWhat is\nthe capital of Russia?\n?\nMoscow\n\nafter";
        let cards = parse(content);
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].kind, CardKind::MultiLineBasic);
        assert_eq!(cards[0].text, "What is\nthe capital of Russia?\n?\nMoscow");
        assert_eq!(cards[0].line_number, 4);
        assert_eq!(cards[0].first_line, 2);
        assert_eq!(cards[0].last_line, 5);
    }

    #[test]
    fn test_multi_line_reversed_at_end_of_file() {
        let cards = parse("Term\n??\nDefinition");
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].kind, CardKind::MultiLineReversed);
        assert_eq!(cards[0].line_number, 1);
        assert_eq!(cards[0].last_line, 2);
    }

    #[test]
    fn test_cloze() {
        let cards = parse("==Berlin== is the capital of ==Germany==.");
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].kind, CardKind::Cloze);
        let parser = CardParser::new(&Delimiters::default()).unwrap();
        assert_eq!(parser.sibling_count(&cards[0]), 2);
    }

    #[test]
    fn test_sibling_counts() {
        let parser = CardParser::new(&Delimiters::default()).unwrap();
        let cards = parser.parse("A::B\n\nC:::D\n\nE\n?\nF\n\nG\n??\nH\n\n{{x}} and **y** and ==z==");
        let counts: Vec<usize> = cards.iter().map(|c| parser.sibling_count(c)).collect();
        assert_eq!(counts, vec![1, 2, 1, 2, 2]);
    }

    #[test]
    fn test_bold_text_is_not_a_cloze() {
        assert!(parse("Some **important** prose.").is_empty());
        let cards = parse("**Bold** term::definition");
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].kind, CardKind::SingleLineBasic);
    }

    #[test]
    fn test_code_block_kept_in_card() {
        let content = "What does this print?\n```\nprint(1)\n\nprint(2)\n```\n?\n1 then 2";
        let cards = parse(content);
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].kind, CardKind::MultiLineBasic);
        assert!(cards[0].text.contains("print(1)\n\nprint(2)"));
        assert_eq!(cards[0].line_number, 6);
    }

    #[test]
    fn test_comments_skipped() {
        let content = "<!--\nA::B\n-->\nC::D";
        let cards = parse(content);
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].text, "C::D");
        assert_eq!(cards[0].line_number, 3);
    }

    #[test]
    fn test_crlf() {
        let cards = parse("A::B\r\n\r\nC::D\r\n");
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[1].line_number, 2);
        assert_eq!(cards[1].text, "C::D");
    }

    #[test]
    fn test_empty_input() {
        assert!(parse("").is_empty());
        assert!(parse("\n   \n  \n").is_empty());
    }

    #[test]
    fn test_plain_text_is_not_a_card() {
        assert!(parse("This is not a card.\n\nNeither is this.").is_empty());
    }

    #[test]
    fn test_custom_delimiters() {
        let delimiters = Delimiters {
            single_line: ">>".to_string(),
            single_line_reversed: "<>".to_string(),
            ..Delimiters::default()
        };
        let parser = CardParser::new(&delimiters).unwrap();
        let cards = parser.parse("a::b\n\nc>>d\n\ne<>f");
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].kind, CardKind::SingleLineBasic);
        assert_eq!(cards[1].kind, CardKind::SingleLineReversed);
    }

    #[test]
    fn test_sides() {
        let parser = CardParser::new(&Delimiters::default()).unwrap();
        let cards = parser.parse(
            "France::Paris\n\nGermany:::Berlin\n\nQ line\n?\nA line\n<!--SR:!2024-01-01,1,250-->\n\n==Rome== is in ==Italy==",
        );
        assert_eq!(parser.sides(&cards[0], 0), ("France".to_string(), "Paris".to_string()));
        assert_eq!(parser.sides(&cards[1], 0), ("Germany".to_string(), "Berlin".to_string()));
        assert_eq!(parser.sides(&cards[1], 1), ("Berlin".to_string(), "Germany".to_string()));
        assert_eq!(parser.sides(&cards[2], 0), ("Q line".to_string(), "A line".to_string()));
        assert_eq!(
            parser.sides(&cards[3], 1),
            ("==Rome== is in [...]".to_string(), "==Rome== is in [==Italy==]".to_string())
        );
    }
}
