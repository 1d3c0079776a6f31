use crate::compat::{decode, encode, CompatModes, MAX_ENCODED_LEN};

#[test]
fn decode_undoes_encode_for_every_mask() {
    for bits in 0..=CompatModes::ALL.bits() {
        let modes = CompatModes::from_bits_truncate(bits);
        let encoded = encode(modes);
        assert!(encoded.len() <= MAX_ENCODED_LEN);
        assert_eq!(decode(&encoded), modes, "mask {bits:05b} encoded as {encoded:?}");
    }
}

#[test]
fn encodes_in_table_order() {
    let modes = CompatModes::IOP_EMULATE_DVD_DL | CompatModes::IOP_ACCURATE_READS;
    assert_eq!(encode(modes), "15");
    assert_eq!(decode("51"), modes);
    assert_eq!(encode(CompatModes::EMPTY), "");
}

#[test]
fn ignores_unknown_codes() {
    assert_eq!(decode("4x 3"), CompatModes::EE_UNHOOK_SYSCALLS);
    assert!(decode("").is_empty());
}

#[test]
fn labels_follow_active_modes() {
    let labels: Vec<_> = decode("02").labels().collect();
    assert_eq!(labels, ["Disable built-in compat flags", "IOP: Sync reads"]);
}
