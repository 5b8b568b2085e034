//! List fakers command implementation

use crate::anonymization::{FakeKind, Locale, ValueFactory, ValueGenerator};
use clap::Args;

/// Arguments for the list-fakers command
#[derive(Args, Debug)]
pub struct ListFakersArgs {
    /// Locale used for the sample values
    #[arg(long, default_value = "en")]
    pub locale: String,
}

impl ListFakersArgs {
    /// Execute the list-fakers command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        print!("{}", self.render());
        Ok(0)
    }

    fn render(&self) -> String {
        let locale = Locale::resolve(Some(self.locale.as_str()));
        let factory = ValueFactory::new(locale, Some(0));

        let mut out = String::new();
        out.push_str(&format!("Faker kinds (sample values in '{}'):\n", locale));
        for kind in FakeKind::ALL {
            let sample = factory.generator(kind).generate();
            out.push_str(&format!("  {:<14} {}\n", kind.name(), sample));
        }
        out.push('\n');
        out.push_str("Locales:\n");
        for locale in Locale::ALL {
            out.push_str(&format!("  {}\n", locale.code()));
        }
        out
    }
}
