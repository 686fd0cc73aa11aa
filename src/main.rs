fn main() {
    if let Err(e) = pinyin_camera_lib::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
