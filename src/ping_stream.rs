use crate::ping::PingSample;

/// Streaming analyzer over raw `ping` output lines.
///
/// Each line carrying a `seq=<digits>` token counts as one successful
/// reply; everything else (banners, errors, summary lines) is skipped
/// without touching analyzer state. Per reply the analyzer emits a
/// [`PingSample`] whose `run_len` is the length of the current unbroken
/// run of consecutive sequence numbers. Any gap, including a sequence
/// number going backwards, restarts the run at the new number.
///
/// The analyzer is single-pass: it owns its state for the lifetime of one
/// stream and cannot be rewound. It is as lazy and as infinite as its
/// input, and blocks only when the input iterator blocks.
pub struct PingGroups<I> {
    lines: I,
    prev_seq: Option<u64>,
    run_start: u64,
    received: u64,
}

impl<I> PingGroups<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    pub fn new(lines: I) -> Self {
        Self {
            lines,
            prev_seq: None,
            run_start: 0,
            received: 0,
        }
    }

    /// Consumes samples until the current run reaches `run_len` consecutive
    /// replies, returning that sample, or `None` if the stream ends first.
    ///
    /// "Long enough a run" is how callers decide connectivity has settled
    /// after a disruption; bound the wall-clock wait on the producer side.
    pub fn wait_stable(&mut self, run_len: u64) -> Option<PingSample> {
        self.find(|sample| sample.run_len >= run_len)
    }
}

impl<I> Iterator for PingGroups<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    type Item = PingSample;

    fn next(&mut self) -> Option<PingSample> {
        loop {
            let line = self.lines.next()?;
            let Some(seq) = parse_seq(line.as_ref()) else {
                continue;
            };

            self.received += 1;
            if self.prev_seq != Some(seq.wrapping_sub(1)) {
                self.run_start = seq;
            }
            self.prev_seq = Some(seq);

            return Some(PingSample {
                sent: seq,
                received: self.received,
                run_len: seq - self.run_start,
            });
        }
    }
}

/// Extracts the ICMP sequence number from one line of ping output.
///
/// Matches the `seq=` token (the `icmp_seq=` form contains it), so reply
/// lines from both `ping` and `ping6` parse; returns `None` for anything
/// else.
fn parse_seq(line: &str) -> Option<u64> {
    let start = line.find("seq=")? + 4;
    let digits: &str = &line[start..];
    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(digits.len(), |(i, _)| i);
    digits[..end].parse().ok()
}
