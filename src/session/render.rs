use std::io::{self, Write};
use std::time::Duration;
use tokio::time::Instant;

use super::stats::TranscriptionResult;

/// Writes transcription results to an output sink in the text format of the
/// `output_<id>.txt` files.
///
/// Elapsed times are measured from the writer's creation.
pub struct TranscriptWriter<W: Write> {
    out: W,
    started: Instant,
    word_time_offsets: bool,
    interim_count: usize,
    final_count: usize,
}

impl<W: Write> TranscriptWriter<W> {
    pub fn new(out: W, word_time_offsets: bool) -> Self {
        Self {
            out,
            started: Instant::now(),
            word_time_offsets,
            interim_count: 0,
            final_count: 0,
        }
    }

    pub fn write_result(&mut self, result: &TranscriptionResult) -> io::Result<()> {
        let elapsed = self.started.elapsed();
        self.write_result_at(result, elapsed)
    }

    fn write_result_at(&mut self, result: &TranscriptionResult, elapsed: Duration) -> io::Result<()> {
        let Some(first) = result.alternatives.first() else {
            return Ok(());
        };
        let secs = elapsed.as_secs_f64();

        if !result.is_final {
            writeln!(self.out, ">>>Time {:.2}s: {}", secs, first.transcript)?;
            self.interim_count += 1;
            return Ok(());
        }

        for (index, alternative) in result.alternatives.iter().enumerate() {
            writeln!(
                self.out,
                "Time {:.2}s: Transcript {}: {}",
                secs, index, alternative.transcript
            )?;
        }

        if self.word_time_offsets {
            writeln!(self.out, "Timestamps:")?;
            writeln!(self.out, "{:<40} {:<16} {:<16}", "Word", "Start (ms)", "End (ms)")?;
            for word in &first.words {
                writeln!(
                    self.out,
                    "{:<40} {:<16.0} {:<16.0}",
                    word.word, word.start_time_ms, word.end_time_ms
                )?;
            }
        }

        self.final_count += 1;
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    pub fn interim_count(&self) -> usize {
        self.interim_count
    }

    pub fn final_count(&self) -> usize {
        self.final_count
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
