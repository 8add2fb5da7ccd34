#![no_main]

use beanpool::jvm::bytecode;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(class_file) = bytecode::decode(data) {
        let _ = class_file.validate();
        let bytes = bytecode::encode(&class_file).expect("A decoded class file must encode");
        assert_eq!(bytes, data);
    }
});
