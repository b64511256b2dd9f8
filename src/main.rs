use calc::config::Config;
use calc::toplevel;

fn main() {
    calc::init_tracing();

    let result = Config::from_args(std::env::args().skip(1))
        .and_then(|config| toplevel::main_loop(&config));
    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
