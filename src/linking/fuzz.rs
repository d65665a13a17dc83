//! Character-level fuzzy alignment.
//!
//! Scores are indel similarities on a 0-100 scale: `100 * (1 - d / (len1 + len2))` where `d`
//! counts the insertions and deletions needed to turn one string into the other. Positions
//! are char indices, not byte offsets.

use std::collections::HashSet;

/// Best alignment of two strings. `src_*` index the first argument, `dest_*` the second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreAlignment {
    pub score: f64,
    pub src_start: usize,
    pub src_end: usize,
    pub dest_start: usize,
    pub dest_end: usize,
}

impl ScoreAlignment {
    fn swapped(self) -> Self {
        Self {
            score: self.score,
            src_start: self.dest_start,
            src_end: self.dest_end,
            dest_start: self.src_start,
            dest_end: self.src_end,
        }
    }
}

fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut cur = vec![0usize; b.len() + 1];
    for ca in a {
        for (j, cb) in b.iter().enumerate() {
            cur[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(cur[j])
            };
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[b.len()]
}

/// Insertions plus deletions turning `a` into `b`.
pub fn indel_distance(a: &[char], b: &[char]) -> usize {
    a.len() + b.len() - 2 * lcs_len(a, b)
}

/// Normalized indel similarity, 0-100. Two empty inputs are identical.
pub fn indel_ratio(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    100.0 * (1.0 - indel_distance(a, b) as f64 / total as f64)
}

fn ratio_above(a: &[char], b: &[char], cutoff: f64) -> f64 {
    let ratio = indel_ratio(a, b);
    if ratio >= cutoff { ratio } else { 0.0 }
}

/// Slides `needle` over `haystack` (`needle.len() <= haystack.len()`).
///
/// Full-length windows are searched by bisection, keeping the first strictly smaller
/// distance and skipping ranges that cannot beat it. Partial windows at either edge
/// are then checked when their boundary char occurs in the needle.
fn partial_ratio_impl(needle: &[char], haystack: &[char], mut score_cutoff: f64) -> ScoreAlignment {
    let len1 = needle.len();
    let len2 = haystack.len();
    let mut res = ScoreAlignment {
        score: 0.0,
        src_start: 0,
        src_end: len1,
        dest_start: 0,
        dest_end: len1,
    };
    let needle_chars: HashSet<char> = needle.iter().copied().collect();

    if len2 > len1 {
        let maximum = 2 * len1;
        let mut cutoff_dist = (maximum as f64 * (1.0 - score_cutoff / 100.0)).ceil() as usize;
        let mut best_dist = None;
        let mut scores = vec![usize::MAX; len2 - len1];
        let mut windows = vec![(0usize, len2 - len1 - 1)];

        while !windows.is_empty() {
            let mut next = Vec::new();
            for (first, last) in windows {
                for pos in [first, last] {
                    if scores[pos] != usize::MAX {
                        continue;
                    }
                    let dist = indel_distance(needle, &haystack[pos..pos + len1]);
                    scores[pos] = dist;
                    if dist < cutoff_dist {
                        cutoff_dist = dist;
                        best_dist = Some(dist);
                        res.dest_start = pos;
                        res.dest_end = pos + len1;
                        if dist == 0 {
                            res.score = 100.0;
                            return res;
                        }
                    }
                }

                let cell_diff = last - first;
                if cell_diff <= 1 {
                    continue;
                }
                let known_edits = scores[first].abs_diff(scores[last]);
                let max_improvement = cell_diff.saturating_sub(known_edits / 2) / 2 * 2;
                let min_score = scores[first].min(scores[last]) as isize - max_improvement as isize;
                if min_score < cutoff_dist as isize {
                    let center = cell_diff / 2;
                    next.push((first, first + center));
                    next.push((first + center, last));
                }
            }
            windows = next;
        }

        if let Some(best) = best_dist {
            let score = 100.0 * (1.0 - best as f64 / maximum as f64);
            if score >= score_cutoff {
                score_cutoff = score;
                res.score = score;
            }
        }
    }

    for i in 1..len1 {
        if !needle_chars.contains(&haystack[i - 1]) {
            continue;
        }
        let ratio = ratio_above(needle, &haystack[..i], score_cutoff);
        if ratio > res.score {
            score_cutoff = ratio;
            res.score = ratio;
            res.dest_start = 0;
            res.dest_end = i;
        }
    }

    for i in len2.saturating_sub(len1)..len2 {
        if !needle_chars.contains(&haystack[i]) {
            continue;
        }
        let ratio = ratio_above(needle, &haystack[i..], score_cutoff);
        if ratio > res.score {
            score_cutoff = ratio;
            res.score = ratio;
            res.dest_start = i;
            res.dest_end = len2;
        }
    }

    res
}

/// Best-matching substring alignment of the shorter string inside the longer one.
///
/// Returns `None` when exactly one input is empty.
pub fn partial_ratio_alignment(s1: &str, s2: &str) -> Option<ScoreAlignment> {
    let a: Vec<char> = s1.chars().collect();
    let b: Vec<char> = s2.chars().collect();
    if a.is_empty() && b.is_empty() {
        return Some(ScoreAlignment {
            score: 100.0,
            src_start: 0,
            src_end: 0,
            dest_start: 0,
            dest_end: 0,
        });
    }
    if a.is_empty() || b.is_empty() {
        return None;
    }

    let (shorter, longer) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };
    let mut res = partial_ratio_impl(shorter, longer, 0.0);
    if res.score != 100.0 && a.len() == b.len() {
        let reverse = partial_ratio_impl(longer, shorter, res.score);
        if reverse.score > res.score {
            res = reverse.swapped();
        }
    }

    Some(if a.len() > b.len() { res.swapped() } else { res })
}
