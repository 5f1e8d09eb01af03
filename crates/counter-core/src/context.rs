//! The counter context codec and engine (C2 + C3): `create`, `update`,
//! `diff`, `merge`, `total`, `clean_node_counts`, and a human-readable
//! render.
//!
//! A context is a raw `Vec<u8>` whose length is an exact multiple of the
//! step length `id_len + 16`. Each step holds one `(id, clock, count)`
//! tuple, big-endian. The packed-byte representation is the wire/storage
//! contract; `merge` builds an id-keyed scratch map internally but the
//! external view is always the flat byte buffer.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use counter_common::{step_length, ContextRelationship, CounterError, CounterResult, Id};

use counter_common::logging::log;

use crate::bytes_codec::{compare_subrange, decode_u64_be, encode_u64_be};

/// One `(id, clock, count)` slot read out of a context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tuple {
    pub id: Id,
    pub clock: u64,
    pub count: i64,
}

fn check_len(ctx: &[u8], id_len: usize) -> CounterResult<()> {
    let step = step_length(id_len);
    if ctx.len() % step != 0 {
        log::warn!(len = ctx.len(), step_length = step, "malformed counter context");
        return Err(CounterError::MalformedContext {
            len: ctx.len(),
            step_length: step,
        });
    }
    Ok(())
}

/// Number of tuples packed into `ctx`, given a per-process id length.
pub fn tuple_count(ctx: &[u8], id_len: usize) -> usize {
    ctx.len() / step_length(id_len)
}

/// Reads the tuple at `step_index` out of `ctx`.
pub fn read_tuple(ctx: &[u8], id_len: usize, step_index: usize) -> Tuple {
    let off = step_index * step_length(id_len);
    let id = ctx[off..off + id_len].to_vec();
    let clock = decode_u64_be(ctx, off + id_len);
    let count = decode_u64_be(ctx, off + id_len + 8) as i64;
    Tuple { id, clock, count }
}

/// Writes one tuple into `ctx` at `step_index`. `ctx` must already be long
/// enough to hold the step.
pub fn write_tuple(ctx: &mut [u8], id_len: usize, step_index: usize, id: &[u8], clock: u64, count: i64) {
    let off = step_index * step_length(id_len);
    ctx[off..off + id_len].copy_from_slice(id);
    encode_u64_be(ctx, off + id_len, clock);
    encode_u64_be(ctx, off + id_len + 8, count as u64);
}

/// Returns a freshly allocated empty context: "no node has ever written."
pub fn create() -> Vec<u8> {
    Vec::new()
}

fn find_id(ctx: &[u8], id_len: usize, id: &[u8]) -> Option<usize> {
    let step = step_length(id_len);
    let n = ctx.len() / step;
    (0..n).find(|&i| compare_subrange(ctx, i * step, id, 0, id_len) == Ordering::Equal)
}

/// Increments `node_id`'s clock by one and its count by `delta`, keeping
/// most-recently-updated ordering (the updated tuple always ends up at
/// offset 0). Returns a fresh buffer; `ctx` is not mutated.
pub fn update(ctx: &[u8], id_len: usize, node_id: &[u8], delta: i64) -> CounterResult<Vec<u8>> {
    check_len(ctx, id_len)?;
    debug_assert_eq!(node_id.len(), id_len);
    let step = step_length(id_len);

    let out = match find_id(ctx, id_len, node_id) {
        Some(found) => {
            let Tuple { clock, count, .. } = read_tuple(ctx, id_len, found);
            let mut out = vec![0u8; ctx.len()];
            write_tuple(&mut out, id_len, 0, node_id, clock + 1, count.wrapping_add(delta));
            // Tuples at [0, found) shift right by one step; tuples after
            // `found` keep their offsets.
            let found_off = found * step;
            out[step..step + found_off].copy_from_slice(&ctx[0..found_off]);
            out[found_off + step..].copy_from_slice(&ctx[found_off + step..]);
            out
        }
        None => {
            let mut out = vec![0u8; ctx.len() + step];
            write_tuple(&mut out, id_len, 0, node_id, 1, delta);
            out[step..].copy_from_slice(ctx);
            out
        }
    };

    log::debug!(node = ?node_id, delta, "counter context updated");
    Ok(out)
}

/// Determines the version-vector relationship between `left` and `right`.
/// Only clocks are consulted — counts are payload, not causal coordinate.
pub fn diff(left: &[u8], right: &[u8], id_len: usize) -> CounterResult<ContextRelationship> {
    check_len(left, id_len)?;
    check_len(right, id_len)?;

    let mut ls: Vec<Tuple> = (0..tuple_count(left, id_len))
        .map(|i| read_tuple(left, id_len, i))
        .collect();
    let mut rs: Vec<Tuple> = (0..tuple_count(right, id_len))
        .map(|i| read_tuple(right, id_len, i))
        .collect();
    ls.sort_by(|a, b| a.id.cmp(&b.id));
    rs.sort_by(|a, b| a.id.cmp(&b.id));

    let mut relation = ContextRelationship::Equal;
    let mut li = 0usize;
    let mut ri = 0usize;

    // widen() folds a single local observation into the running relation,
    // collapsing to Disjoint the moment the two sides disagree in
    // direction (one side strictly ahead on one id, the other side
    // strictly ahead on another).
    fn widen(relation: ContextRelationship, local: Ordering) -> ContextRelationship {
        use ContextRelationship::*;
        use Ordering::*;
        match (relation, local) {
            (_, Equal) => relation,
            (Equal, Greater) => GreaterThan,
            (Equal, Less) => LessThan,
            (GreaterThan, Greater) => GreaterThan,
            (LessThan, Less) => LessThan,
            (GreaterThan, Less) => Disjoint,
            (LessThan, Greater) => Disjoint,
            (Disjoint, _) => Disjoint,
        }
    }

    while li < ls.len() && ri < rs.len() {
        match ls[li].id.cmp(&rs[ri].id) {
            Ordering::Equal => {
                let cmp = ls[li].clock.cmp(&rs[ri].clock);
                relation = widen(relation, cmp);
                li += 1;
                ri += 1;
            }
            Ordering::Less => {
                // id present only on the left: left is ahead at this id.
                relation = widen(relation, Ordering::Greater);
                li += 1;
            }
            Ordering::Greater => {
                relation = widen(relation, Ordering::Less);
                ri += 1;
            }
        }
        if relation == ContextRelationship::Disjoint {
            break;
        }
    }
    if relation != ContextRelationship::Disjoint {
        if li < ls.len() {
            relation = widen(relation, Ordering::Greater);
        }
        if ri < rs.len() {
            relation = widen(relation, Ordering::Less);
        }
    }

    log::debug!(?relation, "counter context diff");
    Ok(relation)
}

/// Reconciles `left` and `right` into a context that reflects their
/// causal union. On the local node's own id, clocks and counts are
/// *summed* (two contexts both reflecting that node's own writes have
/// disjoint local event sets). On every other id, the tuple with the
/// higher clock wins; ties are broken deterministically by descending id
/// so that two replicas merging the same input set produce byte-identical
/// output.
pub fn merge(left: &[u8], right: &[u8], id_len: usize, local_id: &[u8]) -> CounterResult<Vec<u8>> {
    check_len(left, id_len)?;
    check_len(right, id_len)?;

    let mut map: HashMap<Id, (u64, i64)> = HashMap::new();
    for i in 0..tuple_count(left, id_len) {
        let t = read_tuple(left, id_len, i);
        map.insert(t.id, (t.clock, t.count));
    }

    let mut local_hits = 0usize;
    let mut remote_new = 0usize;
    let mut remote_shared = 0usize;

    for i in 0..tuple_count(right, id_len) {
        let t = read_tuple(right, id_len, i);
        match map.get(&t.id).copied() {
            None => {
                remote_new += 1;
                map.insert(t.id, (t.clock, t.count));
            }
            Some((c0, n0)) if t.id.as_slice() == local_id => {
                local_hits += 1;
                map.insert(t.id, (c0.wrapping_add(t.clock), n0.wrapping_add(t.count)));
            }
            Some((c0, n0)) => {
                remote_shared += 1;
                // Equal-clock-from-the-same-id implies equal count (I2 +
                // no rewinding), so either side can be kept on a tie.
                if t.clock > c0 {
                    map.insert(t.id, (t.clock, t.count));
                }
            }
        }
    }

    let mut tuples: Vec<(Id, u64, i64)> = map.into_iter().map(|(id, (c, n))| (id, c, n)).collect();
    // Sorted by descending clock; ties broken by descending id so the
    // output is deterministic across replicas regardless of hash map
    // iteration order.
    tuples.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| b.0.cmp(&a.0)));

    let step = step_length(id_len);
    let mut out = vec![0u8; tuples.len() * step];
    for (i, (id, clock, count)) in tuples.iter().enumerate() {
        write_tuple(&mut out, id_len, i, id, *clock, *count);
    }

    log::debug!(local_hits, remote_new, remote_shared, "counter context merged");
    Ok(out)
}

/// Sum of all `count` fields, as a signed 64-bit wrapping sum.
pub fn total(ctx: &[u8], id_len: usize) -> CounterResult<i64> {
    check_len(ctx, id_len)?;
    let mut sum: i64 = 0;
    for i in 0..tuple_count(ctx, id_len) {
        sum = sum.wrapping_add(read_tuple(ctx, id_len, i).count);
    }
    Ok(sum)
}

/// Removes the tuple matching `node_id`; a no-op if absent. Never mutates
/// `ctx`; returns a fresh buffer, shorter by one step on a hit.
pub fn clean_node_counts(ctx: &[u8], id_len: usize, node_id: &[u8]) -> CounterResult<Vec<u8>> {
    check_len(ctx, id_len)?;
    let step = step_length(id_len);
    match find_id(ctx, id_len, node_id) {
        None => Ok(ctx.to_vec()),
        Some(found) => {
            let found_off = found * step;
            let mut out = Vec::with_capacity(ctx.len() - step);
            out.extend_from_slice(&ctx[..found_off]);
            out.extend_from_slice(&ctx[found_off + step..]);
            Ok(out)
        }
    }
}

/// Renders `ctx` as `[{host, clock, count}, ...]`. `decode_host` turns an
/// id's bytes into a displayable address string; if it returns `None`,
/// `?.?.?.?` is substituted (mirroring the source's behavior on an
/// undecodable id).
pub fn render(ctx: &[u8], id_len: usize, decode_host: impl Fn(&[u8]) -> Option<String>) -> CounterResult<String> {
    check_len(ctx, id_len)?;
    let mut parts = Vec::with_capacity(tuple_count(ctx, id_len));
    for i in 0..tuple_count(ctx, id_len) {
        let t = read_tuple(ctx, id_len, i);
        let host = decode_host(&t.id).unwrap_or_else(|| "?.?.?.?".to_string());
        parts.push(format!("{{{host}, {}, {}}}", t.clock, t.count));
    }
    Ok(format!("[{}]", parts.join(",")))
}

/// A `Display` wrapper around a context for callers who want plain
/// `{:?}`-free rendering without a host decoder (ids print as raw bytes).
pub struct ContextDisplay<'a> {
    pub ctx: &'a [u8],
    pub id_len: usize,
}

impl fmt::Display for ContextDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match render(self.ctx, self.id_len, |_| None) {
            Ok(s) => f.write_str(&s),
            Err(e) => write!(f, "<{e}>"),
        }
    }
}
