use crate::types::TokenRef;
use crate::Error;
use std::collections::{HashMap, HashSet, VecDeque};

/// Index of a synset within a `LexicalTaxonomy`.
pub type SynsetId = usize;

/// A concept node of the taxonomy, named `lemma.pos.NN` (e.g. `milk.n.01`).
#[derive(Debug, Clone, PartialEq)]
pub struct Synset {
    pub name: String,
    pub pos: char,
    pub lemmas: Vec<String>,
    pub hypernyms: Vec<SynsetId>,
}

/// An "is-a" hierarchy of word senses, used for Wu-Palmer similarity.
#[derive(Debug, Clone, Default)]
pub struct LexicalTaxonomy {
    synsets: Vec<Synset>,
    synset_ids: HashMap<String, SynsetId>,
    lemma_senses: HashMap<String, Vec<SynsetId>>,
    max_depths: Vec<usize>,
}

impl LexicalTaxonomy {
    /// Parses a taxonomy from tab-separated lines:
    ///
    /// ```text
    /// synset<TAB>lemma,lemma,...<TAB>hypernym,hypernym,...
    /// ```
    ///
    /// Hypernyms may be declared after the synsets that reference them. A
    /// lemma's senses are numbered in the order they appear.
    pub fn from_tsv(text: &str) -> Result<Self, Error> {
        let mut taxonomy = LexicalTaxonomy::default();
        let mut pending_hypernyms: Vec<(usize, Vec<String>)> = Vec::new();

        for (line_index, line) in text.lines().enumerate() {
            let line_number = line_index + 1;
            if line.trim().is_empty() || line.trim_start().starts_with('#') {
                continue;
            }

            let columns: Vec<&str> = line.split('\t').map(str::trim).collect();
            if columns.len() < 2 || columns.len() > 3 {
                return Err(Error::ParserError(format!(
                    "Line {}: expected 2 or 3 tab-separated columns, found {}",
                    line_number,
                    columns.len()
                )));
            }

            let name = columns[0];
            let pos = parse_pos(name).ok_or_else(|| {
                Error::ParserError(format!(
                    "Line {}: synset name {:?} is not of the form lemma.pos.NN",
                    line_number, name
                ))
            })?;

            if taxonomy.synset_ids.contains_key(name) {
                return Err(Error::ParserError(format!(
                    "Line {}: duplicate synset {:?}",
                    line_number, name
                )));
            }

            let lemmas: Vec<String> = split_list(columns[1])
                .map(|lemma| lemma.to_lowercase())
                .collect();
            if lemmas.is_empty() {
                return Err(Error::ParserError(format!(
                    "Line {}: synset {:?} has no lemmas",
                    line_number, name
                )));
            }

            let id = taxonomy.synsets.len();
            for lemma in &lemmas {
                taxonomy
                    .lemma_senses
                    .entry(lemma.clone())
                    .or_default()
                    .push(id);
            }
            taxonomy.synset_ids.insert(name.to_string(), id);
            taxonomy.synsets.push(Synset {
                name: name.to_string(),
                pos,
                lemmas,
                hypernyms: Vec::new(),
            });

            let hypernyms = columns
                .get(2)
                .map(|column| split_list(column).map(String::from).collect())
                .unwrap_or_default();
            pending_hypernyms.push((line_number, hypernyms));
        }

        for (id, (line_number, hypernym_names)) in pending_hypernyms.into_iter().enumerate() {
            for hypernym_name in hypernym_names {
                let hypernym_id = *taxonomy.synset_ids.get(&hypernym_name).ok_or_else(|| {
                    Error::ParserError(format!(
                        "Line {}: unknown hypernym {:?}",
                        line_number, hypernym_name
                    ))
                })?;
                taxonomy.synsets[id].hypernyms.push(hypernym_id);
            }
        }

        taxonomy.max_depths = taxonomy.compute_max_depths()?;

        Ok(taxonomy)
    }

    /// Longest hypernym path of every synset, rejecting cycles.
    fn compute_max_depths(&self) -> Result<Vec<usize>, Error> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Unvisited,
            InProgress,
            Done,
        }

        let mut marks = vec![Mark::Unvisited; self.synsets.len()];
        let mut depths = vec![0usize; self.synsets.len()];

        for start in 0..self.synsets.len() {
            if marks[start] == Mark::Done {
                continue;
            }

            // Iterative post-order walk up the hypernym edges
            let mut stack: Vec<(SynsetId, usize)> = vec![(start, 0)];
            marks[start] = Mark::InProgress;

            while let Some((id, next_parent)) = stack.pop() {
                let hypernyms = &self.synsets[id].hypernyms;

                if next_parent < hypernyms.len() {
                    stack.push((id, next_parent + 1));
                    let parent = hypernyms[next_parent];
                    match marks[parent] {
                        Mark::Done => {}
                        Mark::InProgress => {
                            return Err(Error::ParserError(format!(
                                "Hypernym cycle through {:?}",
                                self.synsets[parent].name
                            )));
                        }
                        Mark::Unvisited => {
                            marks[parent] = Mark::InProgress;
                            stack.push((parent, 0));
                        }
                    }
                } else {
                    depths[id] = hypernyms
                        .iter()
                        .map(|parent| depths[*parent] + 1)
                        .max()
                        .unwrap_or(0);
                    marks[id] = Mark::Done;
                }
            }
        }

        Ok(depths)
    }

    pub fn len(&self) -> usize {
        self.synsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.synsets.is_empty()
    }

    pub fn synset(&self, id: SynsetId) -> &Synset {
        &self.synsets[id]
    }

    pub fn synset_by_name(&self, name: &str) -> Option<SynsetId> {
        self.synset_ids.get(name).copied()
    }

    /// The first noun sense listing `word` as a lemma. Multiword lemmas are
    /// written with underscores (`soft_drink`).
    pub fn first_noun_sense(&self, word: &TokenRef) -> Option<SynsetId> {
        let lemma = word.to_lowercase().replace(' ', "_");

        self.lemma_senses
            .get(&lemma)?
            .iter()
            .copied()
            .find(|id| self.synsets[*id].pos == 'n')
    }

    /// Longest number of hypernym edges between the synset and a root.
    pub fn max_depth(&self, id: SynsetId) -> usize {
        self.max_depths[id]
    }

    /// Fewest hypernym edges from `id` to each of its ancestors (itself included).
    fn ancestor_distances(&self, id: SynsetId) -> HashMap<SynsetId, usize> {
        let mut distances = HashMap::from([(id, 0)]);
        let mut queue = VecDeque::from([id]);

        while let Some(current) = queue.pop_front() {
            let distance = distances[&current];
            for &parent in &self.synsets[current].hypernyms {
                if !distances.contains_key(&parent) {
                    distances.insert(parent, distance + 1);
                    queue.push_back(parent);
                }
            }
        }

        distances
    }

    /// Fewest hypernym edges from `id` up to `ancestor`, if it is one.
    pub fn shortest_path_distance(&self, id: SynsetId, ancestor: SynsetId) -> Option<usize> {
        self.ancestor_distances(id).get(&ancestor).copied()
    }

    /// Deepest common hypernym of both synsets (ties go to the lower id).
    pub fn lowest_common_hypernym(&self, a: SynsetId, b: SynsetId) -> Option<SynsetId> {
        let a_ancestors: HashSet<SynsetId> = self.ancestor_distances(a).into_keys().collect();

        self.ancestor_distances(b)
            .into_keys()
            .filter(|id| a_ancestors.contains(id))
            .max_by(|x, y| {
                self.max_depths[*x]
                    .cmp(&self.max_depths[*y])
                    .then_with(|| y.cmp(x))
            })
    }

    /// Wu-Palmer similarity: `2 * depth(lcs) / (len(a) + len(b))`, where the
    /// lengths run from each synset through the least common subsumer to the
    /// root, and the root counts as depth 1.
    ///
    /// Returns `None` when the synsets share no ancestor.
    pub fn wup_similarity(&self, a: SynsetId, b: SynsetId) -> Option<f64> {
        let a_distances = self.ancestor_distances(a);
        let b_distances = self.ancestor_distances(b);

        let subsumer = a_distances
            .keys()
            .filter(|id| b_distances.contains_key(*id))
            .copied()
            .max_by(|x, y| {
                self.max_depths[*x]
                    .cmp(&self.max_depths[*y])
                    .then_with(|| y.cmp(x))
            })?;

        let depth = (self.max_depths[subsumer] + 1) as f64;
        let len_a = a_distances[&subsumer] as f64 + depth;
        let len_b = b_distances[&subsumer] as f64 + depth;

        Some(2.0 * depth / (len_a + len_b))
    }

    /// Similarity between the first noun senses of two words; `None` when
    /// either word has no noun sense or the senses are unrelated.
    pub fn word_similarity(&self, a: &TokenRef, b: &TokenRef) -> Option<f64> {
        let a_sense = self.first_noun_sense(a)?;
        let b_sense = self.first_noun_sense(b)?;

        self.wup_similarity(a_sense, b_sense)
    }
}

fn split_list(column: &str) -> impl Iterator<Item = &str> {
    column
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
}

/// Part of speech encoded in a `lemma.pos.NN` synset name.
fn parse_pos(name: &str) -> Option<char> {
    let mut parts = name.rsplitn(3, '.');
    let number = parts.next()?;
    let pos = parts.next()?;
    let lemma = parts.next()?;

    if lemma.is_empty() || number.is_empty() || !number.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let mut pos_chars = pos.chars();
    match (pos_chars.next(), pos_chars.next()) {
        (Some(c), None) if "nvasr".contains(c) => Some(c),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TAXONOMY: &str = "\
# synset\tlemmas\thypernyms
entity.n.01\tentity
food.n.01\tfood,nutrient\tentity.n.01
dairy_product.n.01\tdairy_product\tfood.n.01
milk.n.01\tmilk\tdairy_product.n.01
cheese.n.01\tcheese\tdairy_product.n.01
beverage.n.01\tbeverage,drink\tfood.n.01
juice.n.01\tjuice\tbeverage.n.01
milkshake.n.01\tmilkshake,shake\tdairy_product.n.01,beverage.n.01
milk.v.01\tmilk\t
island.n.01\tisland
";

    fn taxonomy() -> LexicalTaxonomy {
        LexicalTaxonomy::from_tsv(TAXONOMY).unwrap()
    }

    #[test]
    fn test_max_depth() {
        let t = taxonomy();
        assert_eq!(t.max_depth(t.synset_by_name("entity.n.01").unwrap()), 0);
        assert_eq!(t.max_depth(t.synset_by_name("milk.n.01").unwrap()), 3);
        assert_eq!(t.max_depth(t.synset_by_name("milkshake.n.01").unwrap()), 3);
    }

    #[test]
    fn test_first_noun_sense_skips_verbs() {
        let t = taxonomy();
        let sense = t.first_noun_sense("Milk").unwrap();
        assert_eq!(t.synset(sense).name, "milk.n.01");
        assert_eq!(t.first_noun_sense("moon"), None);
    }

    #[test]
    fn test_identical_senses_score_one() {
        let t = taxonomy();
        assert_eq!(t.word_similarity("milk", "milk"), Some(1.0));
    }

    #[test]
    fn test_wup_siblings() {
        let t = taxonomy();
        // lcs dairy_product at depth 3; both senses at depth 4
        let sim = t.word_similarity("milk", "cheese").unwrap();
        assert!((sim - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_wup_cousins() {
        let t = taxonomy();
        // lcs food at depth 2; milk and juice at depth 4
        let sim = t.word_similarity("milk", "juice").unwrap();
        assert!((sim - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_wup_is_symmetric() {
        let t = taxonomy();
        assert_eq!(
            t.word_similarity("cheese", "drink"),
            t.word_similarity("drink", "cheese")
        );
    }

    #[test]
    fn test_multiple_hypernyms_use_shortest_path() {
        let t = taxonomy();
        // lcs beverage (depth 3); shake is one edge below it, juice too
        let sim = t.word_similarity("shake", "juice").unwrap();
        assert!((sim - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_unrelated_roots_have_no_similarity() {
        let t = taxonomy();
        assert_eq!(t.word_similarity("milk", "island"), None);
    }

    #[test]
    fn test_shortest_path_distance() {
        let t = taxonomy();
        let milk = t.synset_by_name("milk.n.01").unwrap();
        let food = t.synset_by_name("food.n.01").unwrap();
        let juice = t.synset_by_name("juice.n.01").unwrap();

        assert_eq!(t.shortest_path_distance(milk, milk), Some(0));
        assert_eq!(t.shortest_path_distance(milk, food), Some(2));
        assert_eq!(t.shortest_path_distance(milk, juice), None);
        assert_eq!(
            t.lowest_common_hypernym(milk, juice),
            Some(food)
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            LexicalTaxonomy::from_tsv("milk.n.01\tmilk\tdairy.n.01"),
            Err(Error::ParserError(_))
        ));
        assert!(matches!(
            LexicalTaxonomy::from_tsv("milk\tmilk"),
            Err(Error::ParserError(_))
        ));
        assert!(matches!(
            LexicalTaxonomy::from_tsv("milk.n.01\tmilk\nmilk.n.01\tmilk"),
            Err(Error::ParserError(_))
        ));
        assert!(matches!(
            LexicalTaxonomy::from_tsv("a.n.01\ta\tb.n.01\nb.n.01\tb\ta.n.01"),
            Err(Error::ParserError(_))
        ));
    }
}
