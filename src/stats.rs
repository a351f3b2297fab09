//! Counters and timings of a FRAIG session.

use std::{fmt, io, time::Duration};

use serde::Serialize;

use crate::EquivResult;

/// Count and timings of the SAT checks that ended with one kind of result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CheckTimes {
    pub count: usize,
    pub total_time: Duration,
    pub max_time: Duration,
}

impl CheckTimes {
    fn record(&mut self, time: Duration) {
        self.count += 1;
        self.total_time += time;
        self.max_time = self.max_time.max(time);
    }

    pub fn average_time(&self) -> Duration {
        if self.count == 0 {
            Duration::ZERO
        } else {
            self.total_time / self.count as u32
        }
    }
}

/// Statistics of one kind of SAT-backed check (constant or equivalence).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SatStat {
    pub total: usize,
    /// Checks proving the property.
    pub proved: CheckTimes,
    /// Checks disproving it with a counterexample.
    pub disproved: CheckTimes,
    /// Checks on which the solver gave up.
    pub aborted: CheckTimes,
}

impl SatStat {
    pub fn record(&mut self, result: EquivResult, time: Duration) {
        self.total += 1;
        match result {
            EquivResult::Equivalent => self.proved.record(time),
            EquivResult::NotEquivalent => self.disproved.record(time),
            EquivResult::Unknown => self.aborted.record(time),
        }
    }
}

impl fmt::Display for SatStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  proved {} / {}", self.proved.count, self.total)?;
        for (name, times) in [
            ("success", &self.proved),
            ("failure", &self.disproved),
            ("abort", &self.aborted),
        ] {
            if times.count > 0 {
                writeln!(
                    f,
                    "  in {} (total/ave./max): {:?} / {:?} / {:?}",
                    name,
                    times.total_time,
                    times.average_time(),
                    times.max_time
                )?;
            }
        }
        Ok(())
    }
}

/// Everything counted during a FRAIG session, see [`Fraig::get_stats`].
///
/// [`Fraig::get_stats`]: crate::Fraig::get_stats
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FraigStats {
    pub node_num: usize,
    pub input_num: usize,
    pub and_num: usize,
    /// [`make_and`](crate::Fraig::make_and) calls answered by the structural hash.
    pub strash_hits: usize,
    /// Nodes given a representative.
    pub merged: usize,
    pub sat_calls: usize,
    pub clauses: usize,
    pub sim_rounds: usize,
    pub sig_words: usize,
    pub sim_time: Duration,
    pub counterexamples: usize,
    pub check_const: SatStat,
    pub check_equiv: SatStat,
}

impl FraigStats {
    /// Human readable dump of the statistics.
    pub fn dump(&self, w: &mut impl io::Write) -> io::Result<()> {
        write!(w, "{}", self)
    }
}

impl fmt::Display for FraigStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "===== FRAIG statistics =====")?;
        writeln!(
            f,
            "nodes: {} ({} inputs, {} and gates, {} merged)",
            self.node_num, self.input_num, self.and_num, self.merged
        )?;
        writeln!(f, "strash hits: {}", self.strash_hits)?;
        writeln!(
            f,
            "simulation: {} rounds, {} words, {} counterexamples, {:?}",
            self.sim_rounds, self.sig_words, self.counterexamples, self.sim_time
        )?;
        writeln!(f, "sat: {} calls, {} clauses", self.sat_calls, self.clauses)?;
        writeln!(f, "----------------------------")?;
        writeln!(f, "check_const:")?;
        write!(f, "{}", self.check_const)?;
        writeln!(f, "----------------------------")?;
        writeln!(f, "check_equiv:")?;
        write!(f, "{}", self.check_equiv)
    }
}
