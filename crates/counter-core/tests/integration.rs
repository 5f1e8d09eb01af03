use bytes::{Bytes, BytesMut};
use counter_core::bloom::hash_buckets;
use counter_core::bytes_codec::LocalId;
use counter_core::context;
use counter_core::read_response::{decode_frame, ReadResponse};
use counter_core::ContextRelationship;

const L: usize = 4;

#[test]
fn replica_update_then_remote_merge_then_total() {
    // Two replicas each take local writes, then reconcile.
    let a_addr = vec![10, 0, 0, 1];
    let b_addr = vec![10, 0, 0, 2];

    let mut a = context::create();
    a = context::update(&a, L, &a_addr, 5).unwrap();
    a = context::update(&a, L, &a_addr, 2).unwrap();

    let mut b = context::create();
    b = context::update(&b, L, &b_addr, 7).unwrap();

    assert_eq!(context::diff(&a, &b, L).unwrap(), ContextRelationship::Disjoint);

    let merged = context::merge(&a, &b, L, &vec![0, 0, 0, 0]).unwrap();
    assert_eq!(context::total(&merged, L).unwrap(), 14);
    assert_eq!(context::diff(&merged, &a, L).unwrap(), ContextRelationship::GreaterThan);
    assert_eq!(context::diff(&merged, &b, L).unwrap(), ContextRelationship::GreaterThan);
}

#[test]
fn local_id_cache_is_write_once_and_idempotent() {
    // Use an address unlikely to collide with other tests running in the
    // same process (the cache is process-wide).
    let addr = [203, 0, 113, 77];
    LocalId::init(&addr).unwrap();
    LocalId::init(&addr).unwrap(); // idempotent re-init, same bytes
    assert_eq!(LocalId::get().unwrap(), addr.to_vec());
    assert!(LocalId::init(&[203, 0, 113, 78]).is_err());
}

#[test]
fn bloom_buckets_feed_a_digest_read_response() {
    let key = b"partition-key-42";
    let buckets = hash_buckets(key, 5, 1 << 16).unwrap();
    assert_eq!(buckets.len(), 5);

    // A coordinator that finds all bits set might still return a digest
    // for comparison rather than the full row.
    let digest = Bytes::from(vec![0xAA; 16]);
    let resp = ReadResponse::Digest(digest.clone());
    let mut out = BytesMut::new();
    resp.encode(&mut out);

    let mut reader = out.freeze();
    let decoded = decode_frame(&mut reader).unwrap();
    assert_eq!(decoded.digest.unwrap(), digest);
}
