//! Browser sub-process helper (requires the `cef-browser` feature).
//!
//! CEF launches render, GPU and utility processes through
//! `browser_subprocess_path`, which defaults to this executable next to the
//! main binary. It hands control straight to CEF and exits with its code.

use cef::args::Args;

fn main() {
    let args = Args::new();

    // >= 0: CEF ran a sub-process. < 0: started as the browser process by mistake.
    let exit_code = cef::execute_process(Some(args.as_main_args()), None, std::ptr::null_mut());
    std::process::exit(if exit_code >= 0 { exit_code } else { 1 });
}
