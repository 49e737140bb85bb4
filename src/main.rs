// Entrypoint for the CLI application.
// - Keeps `main` small: create an API client, hand it to the App, run the
//   top menu over the real console streams.
// - A panic escaping an action is caught here so a bug in one operation
//   cannot take the whole session down silently.

use std::io;

use gpm_cli::{api::ApiClient, app::App, menu::Console};

fn main() -> anyhow::Result<()> {
    // Base URL comes from `GPM_API_URL` or defaults to the local dev server.
    let api = ApiClient::from_env()?;
    let mut app = App::new(api);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut input = stdin.lock();
    let mut out = stdout.lock();
    let mut console = Console {
        input: &mut input,
        out: &mut out,
    };

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        app.run(&mut console)
    }));
    match result {
        Ok(run_result) => run_result,
        Err(_) => {
            eprintln!("Panic error!");
            std::process::exit(1);
        }
    }
}
