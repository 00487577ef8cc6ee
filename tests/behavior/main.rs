use cloudshelf::error::Result;
use libtest_mimic::Arguments;
use libtest_mimic::Trial;

mod operations;
mod utils;

pub use utils::*;

fn main() -> Result<()> {
    let args = Arguments::from_args();

    let mut tests = Vec::new();

    operations::list::tests(&mut tests);
    operations::delete::tests(&mut tests);
    operations::download::tests(&mut tests);
    operations::upload::tests(&mut tests);
    operations::usage::tests(&mut tests);

    let _ = tracing_subscriber::fmt()
        .pretty()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let conclusion = libtest_mimic::run(&args, tests);

    TEST_FIXTURE.cleanup();

    conclusion.exit()
}
