#![no_main]

use core::time::Duration;
use std::collections::HashSet;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use varpick_core::{ElementId, EnvironmentSignals, HostCommand, Mark, TokenElement};
use varpick_web::{Picker, PickerConfig, PickerInput, TapTarget};

#[derive(Debug, Arbitrary)]
enum Event {
    Mutation(Vec<(u8, bool)>),
    DragStart(u8),
    DragEnd(u8),
    DragEnter(u8),
    DragOver(u8),
    DragLeave(u8),
    Drop(u8, Option<u8>),
    TapToken(u8),
    TapZone(u8),
    TapOutside,
    Advance(u16),
}

#[derive(Debug, Arbitrary)]
struct Session {
    touch: bool,
    events: Vec<Event>,
}

// Tokens live in 0..16, zones in 16..20, the pool is 100.
fn token(raw: u8) -> ElementId {
    ElementId::new(u32::from(raw % 16))
}

fn zone(raw: u8) -> ElementId {
    ElementId::new(16 + u32::from(raw % 4))
}

fuzz_target!(|session: Session| {
    let signals = if session.touch {
        EnvironmentSignals::touch_screen(1)
    } else {
        EnvironmentSignals::pointer_only()
    };
    let mut config = PickerConfig::new(ElementId::new(100), |_, _| {})
        .validate_with(|token, kind| token.len() % 2 == kind.as_str().len() % 2);
    for index in 0..4 {
        config = config.zone(ElementId::new(16 + index), format!("zone{index}"));
    }
    let Ok((mut picker, _)) = Picker::init(config, &signals, Vec::<TokenElement>::new())
    else {
        return;
    };

    // Elements holding listeners while they stay in the pool.
    let mut listens = HashSet::new();
    for event in session.events {
        let input = match event {
            Event::Mutation(tokens) => PickerInput::Mutation {
                tokens: tokens
                    .into_iter()
                    .map(|(raw, disabled)| {
                        let element = token(raw);
                        let token = TokenElement::new(element, format!("x{}", element.get()));
                        if disabled { token.disabled() } else { token }
                    })
                    .collect(),
            },
            Event::DragStart(raw) => PickerInput::DragStart { token: token(raw) },
            Event::DragEnd(raw) => PickerInput::DragEnd { token: token(raw) },
            Event::DragEnter(raw) => PickerInput::DragEnter { zone: zone(raw) },
            Event::DragOver(raw) => PickerInput::DragOver { zone: zone(raw) },
            Event::DragLeave(raw) => PickerInput::DragLeave { zone: zone(raw) },
            Event::Drop(raw, data) => PickerInput::Drop {
                zone: zone(raw),
                data: data.map(|d| format!("x{d}")),
            },
            Event::TapToken(raw) => PickerInput::Tap {
                target: TapTarget::Token(token(raw)),
            },
            Event::TapZone(raw) => PickerInput::Tap {
                target: TapTarget::Zone(zone(raw)),
            },
            Event::TapOutside => PickerInput::Tap {
                target: TapTarget::Outside,
            },
            Event::Advance(ms) => PickerInput::Tick {
                now: picker.now() + Duration::from_millis(u64::from(ms)),
            },
        };
        if let PickerInput::Mutation { tokens } = &input {
            let present: HashSet<ElementId> = tokens.iter().map(|t| t.element).collect();
            listens.retain(|element| present.contains(element));
        }
        let dispatch = picker.dispatch(input);

        for command in &dispatch.commands {
            if let HostCommand::Listen { element, .. } = command {
                assert!(listens.insert(*element), "listeners attached twice");
            }
            if let HostCommand::AddMark {
                mark: Mark::Selected,
                ..
            } = command
            {
                assert!(session.touch, "selection in pointer mode");
            }
        }
        if !session.touch {
            assert!(picker.selection().is_none());
        }
    }
});
