/*!
 * Core narration service implementation.
 *
 * This module contains the main NarrationService struct, which turns one
 * normalized narration script into audio bytes plus a synchronized
 * transcript, synthesizing in sentence-boundary chunks when the script
 * exceeds the engine's character budget.
 */

use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use anyhow::{anyhow, Context, Result};
use log::{debug, info, warn};
use tokio::process::Command;

use crate::app_config::{Config, PronunciationRule, TimingConfig};
use crate::engine::{build_engine, SpeechEngine, SynthesisRequest};
use crate::markdown::NarrationScript;
use crate::narration::cache::SynthesisCache;
use crate::narration::chunker::split_script_into_chunks;
use crate::timing::{build_policy, TimingPolicy};
use crate::transcript::{clamp_to_duration, round2, Cue, Transcript, TranscriptMetadata};

/// Result of narrating one document
#[derive(Debug)]
pub struct NarrationOutput {
    /// Concatenated encoded audio (MP3)
    pub audio: Vec<u8>,

    /// Synchronized transcript matching the audio
    pub transcript: Transcript,

    /// Number of chunks synthesized (1 for whole-document mode)
    pub chunk_count: usize,
}

/// Narration service gluing the engine, the chunker and the timing policy
pub struct NarrationService {
    /// Active speech engine
    engine: Arc<dyn SpeechEngine>,

    /// Active timing policy
    policy: Arc<dyn TimingPolicy>,

    /// Voice identifier passed to the engine
    voice: String,

    /// Character budget per synthesized chunk
    max_chars_per_chunk: usize,

    /// Rate constants for pauses and estimation
    timing: TimingConfig,

    /// Pronunciation substitution table
    pronunciation: Vec<PronunciationRule>,

    /// In-memory cache of engine results
    cache: SynthesisCache,
}

impl NarrationService {
    /// Create a service from the application configuration
    pub fn new(config: &Config) -> Result<Self> {
        let engine = build_engine(&config.engine);
        Ok(Self::with_engine(config, engine))
    }

    /// Create a service with an injected engine, for tests and embedding
    pub fn with_engine(config: &Config, engine: Arc<dyn SpeechEngine>) -> Self {
        Self {
            engine,
            policy: build_policy(&config.timing),
            voice: config.engine.get_voice(),
            max_chars_per_chunk: config.engine.get_max_chars_per_chunk(),
            timing: config.timing.clone(),
            pronunciation: config.pronunciation.clone(),
            cache: SynthesisCache::default(),
        }
    }

    /// Probe whether the configured engine is usable
    pub async fn test_connection(&self) -> Result<()> {
        self.engine
            .test_availability()
            .await
            .map_err(|e| anyhow!("Engine availability check failed: {}", e))
    }

    /// Narrate one script into audio bytes and a synchronized transcript.
    ///
    /// `audio_file_name` is recorded in the transcript metadata so the player
    /// can find the companion file.
    pub async fn narrate(&self, script: &NarrationScript, audio_file_name: &str) -> Result<NarrationOutput> {
        if script.is_empty() {
            return Err(anyhow!("Document contains no narratable text"));
        }

        let full_audio_text = script.audio_text(&self.pronunciation);
        let chunks = if full_audio_text.chars().count() > self.max_chars_per_chunk {
            split_script_into_chunks(script, self.max_chars_per_chunk)
        } else {
            vec![script.clone()]
        };
        let chunked = chunks.len() > 1;

        if chunked {
            info!(
                "Script of {} chars split into {} chunks (budget {})",
                full_audio_text.chars().count(),
                chunks.len(),
                self.max_chars_per_chunk
            );
        }

        let mut audio: Vec<u8> = Vec::new();
        let mut cues: Vec<Cue> = Vec::new();
        // Running start time of the next chunk. Advanced by the measured
        // duration of each produced chunk, never by an estimate, so text and
        // audio cannot drift apart across chunk boundaries.
        let mut offset = 0.0f64;

        for (index, chunk) in chunks.iter().enumerate() {
            let chunk_text = chunk.audio_text(&self.pronunciation);
            if chunk_text.is_empty() {
                continue;
            }

            let result = match self.cache.get(&self.voice, &chunk_text) {
                Some(result) => result,
                None => {
                    let mut request = SynthesisRequest::new(chunk_text.clone(), self.voice.clone());
                    if self.engine.supports_markup() {
                        request = request
                            .with_markup(chunk.ssml(&self.voice, &self.pronunciation, &self.timing));
                    }

                    let result = self
                        .engine
                        .synthesize(&request)
                        .await
                        .map_err(|e| anyhow!("Synthesis failed for chunk {}: {}", index + 1, e))?;
                    self.cache.store(&self.voice, &chunk_text, &result);
                    result
                }
            };

            if result.audio.is_empty() {
                warn!("Engine produced no audio for chunk {}; skipping it", index + 1);
                continue;
            }

            // Real decoded duration of this chunk; needed whenever another
            // chunk will be appended after this one.
            let duration = match result.duration_secs {
                Some(d) => d,
                None if chunked => probe_audio_duration(&result.audio).await?,
                None => 0.0,
            };

            let mut chunk_cues = self.policy.cues(chunk, &result);

            // Estimated timelines are reconciled to the measured chunk length
            // before shifting, so concatenation stays aligned.
            if chunked && self.policy.is_estimated() {
                if let Some(last) = chunk_cues.last() {
                    if last.end > 0.0 && duration > 0.0 {
                        let factor = duration / last.end;
                        chunk_cues = chunk_cues.iter().map(|c| c.scaled(factor)).collect();
                    }
                }
            }

            cues.extend(chunk_cues.iter().map(|c| c.shifted(offset)));

            debug!(
                "Chunk {}/{}: {} bytes, {:.2}s, {} cues at offset {:.2}s",
                index + 1,
                chunks.len(),
                result.audio.len(),
                duration,
                chunk_cues.len(),
                offset
            );

            audio.extend_from_slice(&result.audio);
            offset += duration;
        }

        if audio.is_empty() {
            return Err(anyhow!("No chunk produced any audio"));
        }

        // In chunked mode the total is measured, so the transcript must not
        // extend past it.
        if chunked {
            clamp_to_duration(&mut cues, offset);
        }

        let metadata = TranscriptMetadata {
            title: script.title.clone(),
            audio_file: audio_file_name.to_string(),
        };

        let transcript = Transcript::new_validated(metadata, self.policy.granularity(), cues)
            .context("Transcript invariant violated")?;

        info!(
            "Narrated '{}': {} cues, ~{:.2}s of audio",
            script.title,
            transcript.cues.len(),
            if chunked { round2(offset) } else { transcript.total_duration() }
        );

        Ok(NarrationOutput {
            audio,
            transcript,
            chunk_count: chunks.len(),
        })
    }

    /// Cache statistics (hits, misses, hit rate)
    pub fn cache_stats(&self) -> (usize, usize, f64) {
        self.cache.stats()
    }
}

/// Measure the decoded duration of an encoded audio buffer with ffprobe.
///
/// The buffer is spooled to a scratch file because ffprobe needs a seekable
/// input to read container metadata.
pub async fn probe_audio_duration(audio: &[u8]) -> Result<f64> {
    let mut scratch = tempfile::NamedTempFile::new()
        .context("Failed to create scratch file for duration probe")?;
    scratch
        .write_all(audio)
        .context("Failed to spool audio to scratch file")?;
    scratch.flush().context("Failed to flush scratch file")?;

    probe_file_duration(scratch.path()).await
}

/// Measure the decoded duration of an audio file with ffprobe
pub async fn probe_file_duration(path: &Path) -> Result<f64> {
    let ffprobe_future = Command::new("ffprobe")
        .args([
            "-v", "error",
            "-show_entries", "format=duration",
            "-of", "default=noprint_wrappers=1:nokey=1",
            path.to_str().unwrap_or_default(),
        ])
        .output();

    let timeout_duration = Duration::from_secs(60);
    let output = tokio::select! {
        result = ffprobe_future => {
            result.map_err(|e| anyhow!("Failed to execute ffprobe command: {}", e))?
        },
        _ = tokio::time::sleep(timeout_duration) => {
            return Err(anyhow!("ffprobe command timed out after 60 seconds"));
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(anyhow!("ffprobe failed: {}", stderr.trim()));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    stdout
        .trim()
        .parse::<f64>()
        .with_context(|| format!("Unparseable ffprobe duration: '{}'", stdout.trim()))
}
