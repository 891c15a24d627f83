#![no_main]

use libfuzzer_sys::fuzz_target;
use varpick_core::{ElementId, EnvironmentSignals, TokenElement};
use varpick_web::input_parser::parse_host_input;
use varpick_web::{Picker, PickerConfig};

fuzz_target!(|data: &[u8]| {
    // The parser must never panic, whatever the host sends.
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };
    let Ok(Some(input)) = parse_host_input(text) else {
        return;
    };

    // Whatever parses must also dispatch cleanly in both modes.
    for signals in [
        EnvironmentSignals::pointer_only(),
        EnvironmentSignals::touch_screen(1),
    ] {
        let config = PickerConfig::new(ElementId::new(0), |_, _| {})
            .zone(ElementId::new(1), "a")
            .zone(ElementId::new(2), "b");
        let Ok((mut picker, _)) = Picker::init(config, &signals, Vec::<TokenElement>::new())
        else {
            return;
        };
        let _ = picker.dispatch(input.clone());
    }
});
