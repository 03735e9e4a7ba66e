//! Property tests for the header codec and frame variants.

use flnet_protocol::{
    parse, ControlFlags, Cyclic, Frame, Header, ModeFlags, ParticipationHeader, Token,
    WireFormat, HEADER_SIZE, NAME_LEN,
};
use proptest::prelude::*;

fn arb_control() -> impl Strategy<Value = ControlFlags> {
    (any::<bool>(), any::<bool>(), 0u32..(1 << 30)).prop_map(
        |(token_holder, participating, reserved)| ControlFlags {
            token_holder,
            participating,
            reserved,
        },
    )
}

fn arb_mode() -> impl Strategy<Value = ModeFlags> {
    (any::<u8>(), 0u8..16, any::<bool>(), 0u8..8).prop_map(
        |(minor_version, major_version, token_mode, reserved)| ModeFlags {
            minor_version,
            major_version,
            token_mode,
            reserved,
        },
    )
}

prop_compose! {
    fn arb_header()(
        tag in any::<[u8; 4]>(),
        words in any::<[u32; 6]>(),
        halves in any::<[u16; 12]>(),
        small in any::<[u8; 8]>(),
        control in arb_control(),
        mode in arb_mode(),
    ) -> Header {
        Header {
            frame_type_tag: tag,
            total_frame_length: words[0],
            source_address: words[1],
            destination_address: words[2],
            version_sequence: words[3],
            sequence: words[4],
            control,
            upper_layer_size: halves[0],
            message_size: halves[1],
            message_address: words[5],
            message_format: small[0],
            message_related: small[1],
            reserved: halves[2],
            type_code: halves[3],
            protocol_version: halves[4],
            common_address1: halves[5],
            common_size1: halves[6],
            common_address2: halves[7],
            common_size2: halves[8],
            mode,
            processing_type: small[2],
            priority: small[3],
            current_block_number: small[4],
            total_block_number: small[5],
            frame_byte_size: halves[9],
            link_status: small[6],
            token_watchdog: small[7],
            refresh_cycle_time: halves[10],
        }
    }
}

proptest! {
    #[test]
    fn header_roundtrip(header in arb_header()) {
        let bytes = header.encode().unwrap();
        prop_assert_eq!(bytes.len(), HEADER_SIZE);
        prop_assert_eq!(Header::decode(&bytes).unwrap(), header);
    }

    #[test]
    fn any_64_bytes_reencode_unchanged(bytes in proptest::collection::vec(any::<u8>(), HEADER_SIZE)) {
        let header = Header::decode(&bytes).unwrap();
        prop_assert_eq!(&header.encode().unwrap()[..], &bytes[..]);
    }

    #[test]
    fn control_flags_occupy_top_bits(token_holder in any::<bool>(), participating in any::<bool>()) {
        let bits = ControlFlags::new(token_holder, participating).to_bits();
        prop_assert_eq!(bits >> 31 == 1, token_holder);
        prop_assert_eq!((bits >> 30) & 1 == 1, participating);
        prop_assert_eq!(bits & 0x3FFF_FFFF, 0);
    }

    #[test]
    fn mode_flags_split_as_packed(minor in any::<u8>(), major in 0u8..16, token_mode in any::<bool>()) {
        let mode = ModeFlags::from_bits(ModeFlags::new(minor, major, token_mode).to_bits());
        prop_assert_eq!(mode.minor_version, minor);
        prop_assert_eq!(mode.major_version, major);
        prop_assert_eq!(mode.token_mode, token_mode);
        prop_assert_eq!(mode.reserved, 0);
    }

    #[test]
    fn token_roundtrip(src in any::<u8>(), dst in any::<u8>(), control in arb_control()) {
        let token = Token::new(src, dst).with_control(control);
        let bytes = token.encode().unwrap();
        prop_assert_eq!(bytes.len(), 64);
        prop_assert_eq!(parse(&bytes).unwrap(), Frame::Token(token));
    }

    #[test]
    fn participation_names_padded_or_truncated(
        node in "[ -~]{0,16}",
        vendor in "[ -~]{0,16}",
        manufacturer in "[ -~]{0,16}",
    ) {
        let trigger = ParticipationHeader::trigger(1, 0xff, &node, &vendor, &manufacturer);
        let bytes = trigger.encode().unwrap();
        prop_assert_eq!(bytes.len(), 96);

        for (offset, name) in [(64, &node), (74, &vendor), (84, &manufacturer)] {
            let field = &bytes[offset..offset + NAME_LEN];
            let kept = name.len().min(NAME_LEN);
            prop_assert_eq!(&field[..kept], &name.as_bytes()[..kept]);
            prop_assert!(field[kept..].iter().all(|&b| b == b' '));
        }

        prop_assert_eq!(parse(&bytes).unwrap(), Frame::Trigger(trigger));
    }

    #[test]
    fn cyclic_roundtrip(data in proptest::collection::vec(any::<u8>(), 0..1024)) {
        let cyclic = Cyclic::new(0x55, 0x01, data.clone()).unwrap();
        let bytes = cyclic.encode().unwrap();

        prop_assert_eq!(bytes.len(), HEADER_SIZE + data.len());
        prop_assert_eq!(cyclic.header.total_frame_length as usize, bytes.len());
        prop_assert_eq!(cyclic.header.frame_byte_size as usize, bytes.len());
        prop_assert_eq!(parse(&bytes).unwrap(), Frame::Cyclic(cyclic));
    }
}
