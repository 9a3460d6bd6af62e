//! Full-text search over part descriptions (tantivy BM25).
//!
//! Each query indexes the parts of its snapshot into a throwaway in-RAM
//! index, so the ranking can never disagree with the snapshot the rest of
//! the query is answered from. Queries are analysed before any part is
//! read: a query whose clauses all reduce to nothing (punctuation, stop
//! words) is rejected whatever the catalog holds.

use tantivy::collector::TopDocs;
use tantivy::query::{AllQuery, BooleanQuery, Occur, PhraseQuery, Query, TermQuery};
use tantivy::schema::{
    Field, IndexRecordOption, STORED, Schema, TextFieldIndexing, TextOptions, Value,
};
use tantivy::tokenizer::{
    Language, LowerCaser, RemoveLongFilter, SimpleTokenizer, Stemmer, StopWordFilter,
    TextAnalyzer, TokenStream,
};
use tantivy::{Index, IndexWriter, TantivyDocument, Term, doc};
use tracing::debug;

use crate::catalog::{CatalogSnapshot, Part};
use crate::error::{PartDbError, Result};
use crate::search::validate_query;
use crate::search::websearch::{self, Clause};

const WRITER_MEMORY_BYTES: usize = 15_000_000;
const ANALYZER: &str = "part_description";
const MAX_TOKEN_BYTES: usize = 40;

pub struct LexicalSearchEngine {
    stemming: bool,
}

impl Default for LexicalSearchEngine {
    fn default() -> Self {
        Self::new(true)
    }
}

/// A query reduced to the terms the description analyzer produces.
/// Only [`LexicalSearchEngine::prepare`] builds one, so it always holds at
/// least one searchable clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexicalQuery {
    text: String,
    groups: Vec<Vec<AnalyzedClause>>,
}

impl LexicalQuery {
    pub fn text(&self) -> &str {
        &self.text
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AnalyzedClause {
    /// Tokens with their offset from the first token; dropped stop words
    /// leave gaps.
    tokens: Vec<(usize, String)>,
    negated: bool,
}

struct PartIndex {
    index: Index,
    ord: Field,
    description: Field,
}

impl LexicalSearchEngine {
    /// `stemming` selects English analysis (stop words dropped, words
    /// reduced to their stem), otherwise words are only lowercased.
    pub fn new(stemming: bool) -> Self {
        Self { stemming }
    }

    /// Every part matching `query`, best BM25 score first, ties by id.
    pub fn search(&self, snapshot: &CatalogSnapshot, query: &str) -> Result<Vec<(Part, f32)>> {
        let prepared = self.prepare(query)?;
        self.run(snapshot, &prepared)
    }

    /// Parse and analyse `query` without touching any catalog data.
    pub fn prepare(&self, query: &str) -> Result<LexicalQuery> {
        let query = validate_query(query)?;
        let mut analyzer = self.analyzer()?;

        let mut groups = Vec::new();
        for group in websearch::parse(query).groups {
            let clauses: Vec<AnalyzedClause> = group
                .iter()
                .filter_map(|clause| analyze_clause(&mut analyzer, clause))
                .collect();
            if !clauses.is_empty() {
                groups.push(clauses);
            }
        }

        if groups.is_empty() {
            return Err(PartDbError::ValidationFailed(format!(
                "query '{query}' has no searchable terms"
            )));
        }
        Ok(LexicalQuery {
            text: query.to_string(),
            groups,
        })
    }

    /// Rank the parts of `snapshot` against an already prepared query.
    pub fn run(
        &self,
        snapshot: &CatalogSnapshot,
        query: &LexicalQuery,
    ) -> Result<Vec<(Part, f32)>> {
        let parts = snapshot.parts();
        if parts.is_empty() {
            return Ok(Vec::new());
        }

        let part_index = self.build_index(parts)?;
        let compiled = compile(part_index.description, query);

        let reader = part_index.index.reader()?;
        let searcher = reader.searcher();
        let hits = searcher.search(compiled.as_ref(), &TopDocs::with_limit(parts.len()))?;

        let mut ranked = Vec::with_capacity(hits.len());
        for (score, address) in hits {
            let stored: TantivyDocument = searcher.doc(address)?;
            let part = stored
                .get_first(part_index.ord)
                .and_then(|value| value.as_u64())
                .and_then(|ord| usize::try_from(ord).ok())
                .and_then(|ord| parts.get(ord));
            if let Some(part) = part {
                ranked.push((part.clone(), score));
            }
        }
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.id.cmp(&b.0.id)));

        debug!(target: "search", query = query.text(), matches = ranked.len(), "lexical search");
        Ok(ranked)
    }

    /// The analyzer shared by indexing and query analysis.
    fn analyzer(&self) -> Result<TextAnalyzer> {
        let base = TextAnalyzer::builder(SimpleTokenizer::default())
            .filter(RemoveLongFilter::limit(MAX_TOKEN_BYTES))
            .filter(LowerCaser);
        if !self.stemming {
            return Ok(base.build());
        }
        let stop_words = StopWordFilter::new(Language::English).ok_or_else(|| {
            PartDbError::Config("no English stop word list available".to_string())
        })?;
        Ok(base
            .filter(stop_words)
            .filter(Stemmer::new(Language::English))
            .build())
    }

    fn build_index(&self, parts: &[Part]) -> Result<PartIndex> {
        let mut builder = Schema::builder();
        let ord = builder.add_u64_field("ord", STORED);
        let indexing = TextFieldIndexing::default()
            .set_tokenizer(ANALYZER)
            .set_index_option(IndexRecordOption::WithFreqsAndPositions);
        let description = builder.add_text_field(
            "description",
            TextOptions::default().set_indexing_options(indexing),
        );
        let index = Index::create_in_ram(builder.build());
        index.tokenizers().register(ANALYZER, self.analyzer()?);

        let mut writer: IndexWriter = index.writer_with_num_threads(1, WRITER_MEMORY_BYTES)?;
        for (position, part) in parts.iter().enumerate() {
            writer.add_document(doc!(
                ord => position as u64,
                description => part.description.clone(),
            ))?;
        }
        writer.commit()?;

        Ok(PartIndex {
            index,
            ord,
            description,
        })
    }
}

/// `None` when the clause analyses to no tokens at all.
fn analyze_clause(analyzer: &mut TextAnalyzer, clause: &Clause) -> Option<AnalyzedClause> {
    let mut stream = analyzer.token_stream(&clause.text);
    let mut tokens = Vec::new();
    while let Some(token) = stream.next() {
        tokens.push((token.position, token.text.clone()));
    }
    let first = tokens.first()?.0;
    Some(AnalyzedClause {
        tokens: tokens
            .into_iter()
            .map(|(position, text)| (position - first, text))
            .collect(),
        negated: clause.negated,
    })
}

/// Translate the prepared query into tantivy queries: clauses of a group
/// are ANDed, groups are ORed.
fn compile(field: Field, query: &LexicalQuery) -> Box<dyn Query> {
    let mut alternatives: Vec<(Occur, Box<dyn Query>)> = Vec::with_capacity(query.groups.len());

    for group in &query.groups {
        let mut clauses: Vec<(Occur, Box<dyn Query>)> = Vec::new();
        let mut has_positive = false;
        for clause in group {
            let compiled = compile_clause(field, clause);
            if clause.negated {
                clauses.push((Occur::MustNot, compiled));
            } else {
                has_positive = true;
                clauses.push((Occur::Must, compiled));
            }
        }
        if !has_positive {
            // A purely negative group matches everything except the exclusions.
            clauses.push((Occur::Must, Box::new(AllQuery)));
        }
        alternatives.push((Occur::Should, Box::new(BooleanQuery::new(clauses))));
    }

    match <[_; 1]>::try_from(alternatives) {
        Ok([(_, only)]) => only,
        Err(alternatives) => Box::new(BooleanQuery::new(alternatives)),
    }
}

fn compile_clause(field: Field, clause: &AnalyzedClause) -> Box<dyn Query> {
    let terms: Vec<(usize, Term)> = clause
        .tokens
        .iter()
        .map(|(offset, text)| (*offset, Term::from_field_text(field, text)))
        .collect();

    match <[_; 1]>::try_from(terms) {
        Ok([(_, term)]) => Box::new(TermQuery::new(term, IndexRecordOption::WithFreqs)),
        // Words that split into several tokens ("m3-bolt") must stay adjacent.
        Err(terms) => Box::new(PhraseQuery::new_with_offset(terms)),
    }
}
