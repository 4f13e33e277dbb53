// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use mc6809::disassembler::{disassemble, format_lines, DisassemblyError};

#[test]
fn jsr_target_is_labelled() {
    let code = [
        0x8E, 0x00, 0x01, // LDX #$0001
        0xBD, 0x40, 0x06, // JSR $4006
        0x8E, 0x00, 0x00, // LDX #$0000
        0x39, // RTS
    ];
    let listing = disassemble(&code, 0x1000).unwrap();
    let lines = format_lines(&listing, true);

    assert!(
        lines.iter().any(|line| line.starts_with(';') && line.contains("$4006")),
        "header must define the $4006 label: {lines:#?}"
    );
    assert!(
        lines.contains(&"1003| BD 40 06    JSR LABEL000".to_owned()),
        "call must reference the label: {lines:#?}"
    );
    assert!(lines.contains(&"1000| 8E 00 01    LDX $0001".to_owned()));
    assert!(lines.contains(&"1009| 39          RTS".to_owned()));
}

#[test]
fn header_is_optional() {
    let code = [0x8E, 0x00, 0x01, 0xBD, 0x40, 0x06, 0x39];
    let listing = disassemble(&code, 0x1000).unwrap();
    let lines = format_lines(&listing, false);
    assert!(lines.iter().all(|line| !line.starts_with(';')));
    // Branch targets keep their labels even without the header.
    assert!(lines.contains(&"1003| BD 40 06    JSR LABEL000".to_owned()));
}

#[test]
fn relative_branches_are_not_labelled() {
    // Branches use relative addressing; only EXTENDED operands get labels.
    let code = [0x26, 0x10, 0x20, 0xFE]; // BNE +$10; BRA -$02
    let listing = disassemble(&code, 0x0000).unwrap();
    assert!(listing.labels.is_empty());
    assert_eq!(
        format_lines(&listing, false),
        ["0000| 26 10       BNE $10", "0002| 20 FE       BRA $FE"],
    );
}

#[test]
fn labels_are_numbered_in_address_order() {
    let code = [
        0xBD, 0x50, 0x00, // JSR $5000
        0xBD, 0x40, 0x00, // JSR $4000
        0x7E, 0x45, 0x00, // JMP $4500
    ];
    let listing = disassemble(&code, 0x1000).unwrap();
    let labels: Vec<(u16, &str)> = listing
        .labels
        .iter()
        .map(|(addr, name)| (*addr, name.as_str()))
        .collect();
    assert_eq!(
        labels,
        [(0x4000, "LABEL000"), (0x4500, "LABEL001"), (0x5000, "LABEL002")],
    );
}

#[test]
fn decode_errors_name_the_fault() {
    let err = disassemble(&[0x39, 0x02], 0x8000).unwrap_err();
    assert_eq!(err, DisassemblyError::UnknownOpcode { address: 0x8001, opcode: 0x02 });
    assert_eq!(format!("{err}"), "$8001 *** UNKNOWN OP $02");

    let err = disassemble(&[0x8E, 0x00], 0x8000).unwrap_err();
    assert!(matches!(err, DisassemblyError::Truncated { address: 0x8000, .. }));
}
