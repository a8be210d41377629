/// Exit the program with an appropriate exit code.
pub fn with_code(code: Code, message: &str) -> ! {
    eprintln!("{}", message);
    std::process::exit(code as i32);
}

/// Based on the BSD sysexits.h conventions.
#[allow(dead_code)]
#[derive(Debug, Copy, Clone)]
pub enum Code {
    Usage = 64,   /* command line usage error */
    DataErr = 65, /* data format error */
    NoInput = 66, /* cannot open input */
}
