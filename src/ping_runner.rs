use std::io::{self, BufRead, BufReader};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// Owns a continuously running platform `ping` process and streams its
/// stdout, line by line, through a channel.
///
/// A reader thread pumps the child's stdout into the channel; the consumer
/// side ([`lines`](PingRunner::lines)) is a blocking iterator that ends
/// when the process exits or is stopped. Feed it to
/// [`PingGroups`](crate::ping_stream::PingGroups) to watch loss windows on
/// a live target.
pub struct PingRunner {
    child: Child,
    receiver: mpsc::Receiver<String>,
}

impl PingRunner {
    /// Spawns `ping` against `target` with the given send interval.
    ///
    /// Windows ping has no interval option, so `-t` (continuous, one per
    /// second) is used there and `interval` is ignored.
    pub fn spawn(target: &str, interval: Duration) -> io::Result<Self> {
        let mut command = if cfg!(target_os = "windows") {
            let mut c = Command::new("ping");
            c.args(["-t", target]);
            c
        } else {
            let mut c = Command::new("ping");
            c.args(["-i", &format!("{}", interval.as_secs_f64()), target]);
            c
        };

        let mut child = command
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::other("ping child has no stdout"))?;

        let (sender, receiver) = mpsc::channel();
        thread::spawn(move || {
            for line in BufReader::new(stdout).lines() {
                match line {
                    Ok(line) => {
                        // Send fails once the receiver hangs up; nobody is
                        // watching anymore.
                        if sender.send(line).is_err() {
                            break;
                        }
                    }
                    Err(_) => break,
                }
            }
        });

        Ok(Self { child, receiver })
    }

    /// Blocking iterator over the ping output lines; ends when the process
    /// exits or after [`stop`](PingRunner::stop).
    pub fn lines(&self) -> mpsc::Iter<'_, String> {
        self.receiver.iter()
    }

    /// Kills and reaps the ping process.
    pub fn stop(mut self) -> io::Result<()> {
        self.child.kill()?;
        self.child.wait()?;
        Ok(())
    }
}

impl Drop for PingRunner {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
