use log::{debug, error, warn};

use crate::markdown::{split_sentences, NarrationScript, Span};

// @module: Sentence-boundary chunk splitting

/// One atom of packable script content
enum Atom {
    Sentence(String),
    Pause(crate::markdown::PauseKind),
}

/// Split a narration script into chunks for independent synthesis.
///
/// Text spans are cut at sentence boundaries and sentences are packed
/// greedily under the character budget; pause spans travel with the chunk
/// being filled and cost nothing. A single sentence longer than the budget
/// cannot be split and gets a chunk of its own.
pub fn split_script_into_chunks(script: &NarrationScript, max_chars_per_chunk: usize) -> Vec<NarrationScript> {
    if script.spans.is_empty() {
        warn!("No narration spans to split into chunks");
        return Vec::new();
    }

    // Handle unreasonably small budgets by enforcing a minimum
    let effective_max_chars = max_chars_per_chunk.max(100);

    // Flatten the script into packable atoms
    let mut atoms = Vec::new();
    for span in &script.spans {
        match span {
            Span::Text(text) => {
                for sentence in split_sentences(text) {
                    atoms.push(Atom::Sentence(sentence));
                }
            }
            Span::Pause(kind) => atoms.push(Atom::Pause(*kind)),
        }
    }

    let total_sentences = atoms
        .iter()
        .filter(|a| matches!(a, Atom::Sentence(_)))
        .count();

    let mut chunks: Vec<NarrationScript> = Vec::new();
    let mut current_spans: Vec<Span> = Vec::new();
    let mut current_size = 0;

    let mut finalize = |spans: &mut Vec<Span>, chunks: &mut Vec<NarrationScript>| {
        if spans.iter().any(|s| matches!(s, Span::Text(_))) {
            chunks.push(NarrationScript {
                title: script.title.clone(),
                spans: std::mem::take(spans),
            });
        } else {
            // A chunk of nothing but pauses has nothing to synthesize
            spans.clear();
        }
    };

    for atom in atoms {
        match atom {
            Atom::Pause(kind) => {
                current_spans.push(Span::Pause(kind));
            }
            Atom::Sentence(sentence) => {
                let sentence_size = sentence.chars().count();

                // An oversized sentence cannot be split further; it gets its own chunk
                if sentence_size > effective_max_chars {
                    finalize(&mut current_spans, &mut chunks);
                    debug!(
                        "Sentence of {} chars exceeds the {} char budget, placing it in its own chunk",
                        sentence_size, effective_max_chars
                    );
                    chunks.push(NarrationScript {
                        title: script.title.clone(),
                        spans: vec![Span::Text(sentence)],
                    });
                    current_size = 0;
                    continue;
                }

                if current_size + sentence_size > effective_max_chars && current_size > 0 {
                    finalize(&mut current_spans, &mut chunks);
                    current_size = 0;
                }

                current_spans.push(Span::Text(sentence));
                current_size += sentence_size;
            }
        }
    }

    finalize(&mut current_spans, &mut chunks);

    // Verify that no sentence was lost while packing
    let chunked_sentences: usize = chunks
        .iter()
        .flat_map(|c| c.spans.iter())
        .filter(|s| matches!(s, Span::Text(_)))
        .count();
    if chunked_sentences != total_sentences {
        error!(
            "CRITICAL ERROR: Lost sentences during chunking! Original: {}, After chunking: {}",
            total_sentences, chunked_sentences
        );
    } else if log::max_level() >= log::LevelFilter::Debug {
        for (i, chunk) in chunks.iter().enumerate() {
            let chunk_chars: usize = chunk
                .spans
                .iter()
                .filter_map(|s| match s {
                    Span::Text(t) => Some(t.chars().count()),
                    Span::Pause(_) => None,
                })
                .sum();
            debug!("Chunk {}: {} spans, {} chars", i + 1, chunk.spans.len(), chunk_chars);
        }
    }

    chunks
}
