/// One successful echo reply as seen by the stream analyzer.
///
/// `sent` is the ICMP sequence number of the reply, `received` the count of
/// replies seen so far on this stream, and `run_len` the length of the
/// current unbroken run of consecutive sequence numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PingSample {
    pub sent: u64,
    pub received: u64,
    pub run_len: u64,
}

#[derive(Debug, Clone, Default)]
pub struct LossStats {
    pub sent: u64,
    pub received: u64,
    pub lost: u64,
    pub loss_rate: f64,
}

impl LossStats {
    /// Loss accounting for a finished observation window, from the last
    /// sample consumed off the stream.
    ///
    /// `ping` numbers its echo requests from 1, so the final sequence number
    /// equals the number of requests sent and `sent - received` is the
    /// number that went unanswered. Saturates for streams numbered from 0.
    pub fn from_sample(last: &PingSample) -> Self {
        let lost = last.sent.saturating_sub(last.received);
        Self {
            sent: last.sent,
            received: last.received,
            lost,
            loss_rate: if last.sent > 0 {
                (lost as f64 / last.sent as f64) * 100.0
            } else {
                0.0
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loss_stats_count_missing_sequence_numbers() {
        // Replies 1..=10 with 4 and 7 missing: the last sample carries seq
        // 10 and 8 received replies.
        let stats = LossStats::from_sample(&PingSample {
            sent: 10,
            received: 8,
            run_len: 3,
        });
        assert_eq!(stats.lost, 2);
        assert!((stats.loss_rate - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn loss_stats_saturate_on_lossless_zero_based_stream() {
        let stats = LossStats::from_sample(&PingSample {
            sent: 9,
            received: 10,
            run_len: 9,
        });
        assert_eq!(stats.lost, 0);
        assert_eq!(stats.loss_rate, 0.0);
    }
}
