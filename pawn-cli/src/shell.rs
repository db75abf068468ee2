use std::io::{BufRead, Write};
use std::str::FromStr;

use pawn_catalog::{Amount, Imei};
use pawn_ledger::{Command, Ledger, LedgerError, Outcome};

const MENU: &[&str] = &[
    "1. Add a Mobile Phone",
    "2. Add a Tablet",
    "3. Sell a Device",
    "4. Release a Device",
    "5. Show Available Devices",
    "6. Show Sold Devices",
    "7. Show Balance",
    "8. Show Summary",
    "9. Exit",
];

enum Flow {
    Continue,
    Exit,
}

/// Interactive console front end over a [`Ledger`].
///
/// All parsing and re-prompting happens here; the ledger only ever sees
/// validated [`Command`]s. End of input is treated like choosing Exit.
pub struct Shell<R, W> {
    input: R,
    output: W,
    ledger: Ledger,
    shop_name: String,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(input: R, output: W, ledger: Ledger, shop_name: impl Into<String>) -> Self {
        Self {
            input,
            output,
            ledger,
            shop_name: shop_name.into(),
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn into_parts(self) -> (Ledger, W) {
        (self.ledger, self.output)
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        loop {
            writeln!(self.output, "Welcome to the {}", self.shop_name)?;
            for line in MENU {
                writeln!(self.output, "{}", line)?;
            }

            let Some(choice) = self.prompt_parsed("Enter your choice", parse_number::<u32>)? else {
                break;
            };

            if let Flow::Exit = self.handle_choice(choice)? {
                break;
            }
        }

        writeln!(self.output, "Thank you for using {}. Goodbye!", self.shop_name)?;
        self.output.flush()?;
        Ok(())
    }

    fn handle_choice(&mut self, choice: u32) -> anyhow::Result<Flow> {
        match choice {
            1 => self.pledge_device(DeviceForm::Phone),
            2 => self.pledge_device(DeviceForm::Tablet),
            3 => {
                let Some(imei) =
                    self.prompt_parsed("Enter IMEI of device to sell", parse_number::<Imei>)?
                else {
                    return Ok(Flow::Exit);
                };
                match self.ledger.execute(Command::Sell { imei }) {
                    Ok(outcome) => self.render(outcome)?,
                    Err(LedgerError::NotFound(_)) => writeln!(
                        self.output,
                        "Device could not be sold (not found or already sold)."
                    )?,
                    Err(e) => writeln!(self.output, "Device could not be sold: {}.", e)?,
                }
                Ok(Flow::Continue)
            }
            4 => {
                let Some(imei) =
                    self.prompt_parsed("Enter IMEI of device to release", parse_number::<Imei>)?
                else {
                    return Ok(Flow::Exit);
                };
                match self.ledger.execute(Command::Release { imei }) {
                    Ok(outcome) => self.render(outcome)?,
                    Err(_) => writeln!(
                        self.output,
                        "Device could not be released (not found or already sold)."
                    )?,
                }
                Ok(Flow::Continue)
            }
            5 => {
                writeln!(self.output, "\nAvailable Devices:")?;
                self.run_query(Command::ListAvailable)
            }
            6 => {
                writeln!(self.output, "\nSold Devices:")?;
                self.run_query(Command::ListSold)
            }
            7 => self.run_query(Command::Balance),
            8 => self.run_query(Command::Summary),
            9 => Ok(Flow::Exit),
            _ => {
                writeln!(self.output, "Invalid choice. Please try again.")?;
                Ok(Flow::Continue)
            }
        }
    }

    fn pledge_device(&mut self, form: DeviceForm) -> anyhow::Result<Flow> {
        let Some(imei) = self.prompt_parsed("Enter IMEI", parse_number::<Imei>)? else {
            return Ok(Flow::Exit);
        };
        let Some(price) = self.prompt_parsed("Enter Price", parse_number::<Amount>)? else {
            return Ok(Flow::Exit);
        };
        let Some(manufacturer) = self.prompt_parsed("Enter Manufacturer", parse_text)? else {
            return Ok(Flow::Exit);
        };
        let Some(allowed_for_sale) =
            self.prompt_parsed("Enter For Sale (1 for Yes, 0 for No)", parse_flag)?
        else {
            return Ok(Flow::Exit);
        };
        let Some(flag) = self.prompt_parsed(form.flag_prompt(), parse_flag)? else {
            return Ok(Flow::Exit);
        };

        let command = match form {
            DeviceForm::Phone => {
                Command::pledge_phone(imei, price, manufacturer, allowed_for_sale, flag)
            }
            DeviceForm::Tablet => {
                Command::pledge_tablet(imei, price, manufacturer, allowed_for_sale, flag)
            }
        };
        tracing::debug!("Executing {:?}", command);

        let outcome = self.ledger.execute(command)?;
        writeln!(self.output, "{} added successfully.", form.label())?;
        self.render(outcome)?;
        Ok(Flow::Continue)
    }

    fn run_query(&mut self, command: Command) -> anyhow::Result<Flow> {
        let outcome = self.ledger.execute(command)?;
        self.render(outcome)?;
        Ok(Flow::Continue)
    }

    fn render(&mut self, outcome: Outcome) -> anyhow::Result<()> {
        match outcome {
            Outcome::Pledged { imei, balance } => {
                writeln!(self.output, "Device {} pledged. Balance: {}", imei, balance)?
            }
            Outcome::Sold { price, .. } => writeln!(self.output, "Device sold for {}.", price)?,
            Outcome::Released { removed, .. } => {
                writeln!(self.output, "Released {} device(s).", removed)?
            }
            Outcome::Listing { text } => writeln!(self.output, "{}\n", text)?,
            Outcome::Balance { balance } => writeln!(self.output, "Account balance: {}", balance)?,
            Outcome::Summary { summary } => {
                writeln!(self.output, "{}", serde_json::to_string_pretty(&summary)?)?
            }
        }
        Ok(())
    }

    /// Prompt until `parse` accepts the line. `None` means input ended.
    fn prompt_parsed<T>(
        &mut self,
        label: &str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> anyhow::Result<Option<T>> {
        loop {
            write!(self.output, "{}: ", label)?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(None);
            }

            match parse(line.trim()) {
                Some(value) => return Ok(Some(value)),
                None => writeln!(self.output, "Invalid input, please try again.")?,
            }
        }
    }
}

#[derive(Clone, Copy)]
enum DeviceForm {
    Phone,
    Tablet,
}

impl DeviceForm {
    fn label(self) -> &'static str {
        match self {
            DeviceForm::Phone => "Mobile phone",
            DeviceForm::Tablet => "Tablet",
        }
    }

    fn flag_prompt(self) -> &'static str {
        match self {
            DeviceForm::Phone => "Enter Supports 5G (1 for Yes, 0 for No)",
            DeviceForm::Tablet => "Enter Can Make Phone Calls (1 for Yes, 0 for No)",
        }
    }
}

fn parse_number<T: FromStr>(text: &str) -> Option<T> {
    text.parse().ok()
}

fn parse_text(text: &str) -> Option<String> {
    if text.is_empty() { None } else { Some(text.to_string()) }
}

fn parse_flag(text: &str) -> Option<bool> {
    match text.to_ascii_lowercase().as_str() {
        "1" | "y" | "yes" | "true" => Some(true),
        "0" | "n" | "no" | "false" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run_script(script: &str) -> (Ledger, String) {
        let input = Cursor::new(script.to_string());
        let mut shell = Shell::new(input, Vec::new(), Ledger::new(), "Test Pawn");
        shell.run().unwrap();
        let (ledger, output) = shell.into_parts();
        (ledger, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag("YES"), Some(true));
        assert_eq!(parse_flag("n"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn test_pledge_and_sell_phone() {
        let (ledger, output) = run_script("1\n1\n100\nSamsung Galaxy\n1\n1\n3\n1\n7\n9\n");

        assert_eq!(ledger.balance(), 240);
        assert!(output.contains("Mobile phone added successfully."));
        assert!(output.contains("Device sold for 140."));
        assert!(output.contains("Account balance: 240"));
        assert!(output.contains("Thank you for using Test Pawn. Goodbye!"));
        assert_eq!(ledger.find(1).unwrap().manufacturer(), "Samsung Galaxy");
    }

    #[test]
    fn test_invalid_input_reprompts() {
        // bad choice, bad IMEI, bad price, empty manufacturer, bad flag
        let (ledger, output) = run_script("abc\n2\nxyz\n5\n-3\n200\n\nApple\nmaybe\n1\n0\n9\n");

        assert_eq!(output.matches("Invalid input, please try again.").count(), 5);
        assert!(output.contains("Tablet added successfully."));
        assert_eq!(ledger.balance(), 200);
        assert_eq!(ledger.find(5).unwrap().pledge_price(), 200);
    }

    #[test]
    fn test_unknown_choice() {
        let (_, output) = run_script("42\n9\n");
        assert!(output.contains("Invalid choice. Please try again."));
    }

    #[test]
    fn test_sell_failures_are_reported() {
        let (ledger, output) = run_script("1\n3\n50\nNokia\n0\n1\n3\n3\n3\n8\n8\n9\n");

        assert!(output.contains("Device could not be sold: Device 3 is not allowed for sale."));
        assert!(output.contains("Device could not be sold (not found or already sold)."));
        assert!(output.contains("\"balance\": 50"));
        assert_eq!(ledger.balance(), 50);
    }

    #[test]
    fn test_release_and_listings() {
        let script = "1\n3\n50\nNokia\n0\n1\n4\n3\n4\n3\n5\n9\n";
        let (ledger, output) = run_script(script);

        assert!(output.contains("Released 1 device(s)."));
        assert!(output.contains("Device could not be released (not found or already sold)."));
        assert!(output.contains("\nAvailable Devices:\n"));
        assert!(ledger.is_empty());
        assert_eq!(ledger.balance(), 50);
    }

    #[test]
    fn test_end_of_input_exits() {
        let (ledger, output) = run_script("1\n7\n");
        assert!(ledger.is_empty());
        assert!(output.ends_with("Goodbye!\n"));
    }
}
