use anyhow::Result;

use sysglance::commands;

fn main() -> Result<()> {
    let matches = commands::build_cli().get_matches();

    if !commands::has_work(&matches) {
        commands::build_cli().print_help()?;
        println!();
        std::process::exit(1);
    }

    sysglance::init_logging(matches.get_flag("verbose"));
    commands::execute(&matches)
}
