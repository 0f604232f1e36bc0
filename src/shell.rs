// 💬 Line Shell - numbered menus over any reader/writer
//
// Main menu:    1 patients | 2 agenda | 3 quit
// Patients:     1 register | 2 remove | 3 list by ID | 4 list by name | 5 back
// Agenda:       1 book | 2 cancel | 3 list date range | 4 list all | 5 back
//
// Every decision is made by the desk; this module only prompts and prints.

use std::io::{BufRead, Write};

use anyhow::Result;

use crate::desk::{AgendaQuery, ClinicDesk};
use crate::entities::{Appointment, SortKey};
use crate::guard::Removal;

pub struct Shell<'d, R, W> {
    desk: &'d mut ClinicDesk,
    input: R,
    output: W,
}

impl<'d, R: BufRead, W: Write> Shell<'d, R, W> {
    pub fn new(desk: &'d mut ClinicDesk, input: R, output: W) -> Self {
        Shell { desk, input, output }
    }

    /// Run until the operator quits or input ends
    pub fn run(&mut self) -> Result<()> {
        loop {
            writeln!(self.output, "========= Clinic Desk =========")?;
            writeln!(self.output, "1. Patients")?;
            writeln!(self.output, "2. Agenda")?;
            writeln!(self.output, "3. Quit")?;
            writeln!(self.output, "===============================")?;

            let Some(choice) = self.prompt("Choose an option: ")? else {
                return Ok(());
            };

            match choice.as_str() {
                "1" => {
                    if !self.patients_menu()? {
                        return Ok(());
                    }
                }
                "2" => {
                    if !self.agenda_menu()? {
                        return Ok(());
                    }
                }
                "3" => {
                    writeln!(self.output, "Leaving the desk...")?;
                    return Ok(());
                }
                _ => writeln!(self.output, "Invalid option. Try again.")?,
            }
        }
    }

    /// Read one trimmed line; None at end of input
    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Prompt for several fields; None if input ends midway
    fn prompt_all<const N: usize>(&mut self, labels: [&str; N]) -> Result<Option<[String; N]>> {
        let mut values: [String; N] = std::array::from_fn(|_| String::new());
        for (value, label) in values.iter_mut().zip(labels) {
            match self.prompt(label)? {
                Some(answer) => *value = answer,
                None => return Ok(None),
            }
        }
        Ok(Some(values))
    }

    // ========================================================================
    // PATIENTS
    // ========================================================================

    /// Returns false when input ended
    fn patients_menu(&mut self) -> Result<bool> {
        loop {
            writeln!(self.output, "1 - Register patient")?;
            writeln!(self.output, "2 - Remove patient")?;
            writeln!(self.output, "3 - List patients by ID")?;
            writeln!(self.output, "4 - List patients by name")?;
            writeln!(self.output, "5 - Back to main menu")?;

            let Some(choice) = self.prompt("Choose an option: ")? else {
                return Ok(false);
            };

            match choice.as_str() {
                "1" => {
                    let Some([id, name, birth]) = self.prompt_all([
                        "Patient ID: ",
                        "Patient name: ",
                        "Birth date (DD/MM/YYYY): ",
                    ])?
                    else {
                        return Ok(false);
                    };
                    match self.desk.register_patient(&id, &name, &birth) {
                        Ok(patient) => writeln!(self.output, "Patient {} registered.", patient.id)?,
                        Err(err) => writeln!(self.output, "Could not register patient: {}.", err)?,
                    }
                }
                "2" => {
                    let Some(id) = self.prompt("ID of the patient to remove: ")? else {
                        return Ok(false);
                    };
                    match self.desk.remove_patient(&id) {
                        Ok(Removal::Removed { patient, .. }) => {
                            writeln!(self.output, "Patient {} removed.", patient.id)?
                        }
                        Ok(Removal::Blocked { pending }) => writeln!(
                            self.output,
                            "Patient has a future appointment and cannot be removed: {}",
                            pending
                        )?,
                        Err(err) => writeln!(self.output, "Could not remove patient: {}.", err)?,
                    }
                }
                "3" => self.print_patients(SortKey::Id)?,
                "4" => self.print_patients(SortKey::Name)?,
                "5" => return Ok(true),
                _ => writeln!(self.output, "Invalid option. Try again.")?,
            }
        }
    }

    fn print_patients(&mut self, key: SortKey) -> Result<()> {
        writeln!(self.output, "--- Patients by {} ---", key.as_str())?;
        let patients = self.desk.list_patients(key);
        if patients.is_empty() {
            writeln!(self.output, "No patients registered.")?;
        }
        for patient in patients {
            writeln!(self.output, "{}", patient)?;
        }
        Ok(())
    }

    // ========================================================================
    // AGENDA
    // ========================================================================

    /// Returns false when input ended
    fn agenda_menu(&mut self) -> Result<bool> {
        loop {
            writeln!(self.output, "1 - Book appointment")?;
            writeln!(self.output, "2 - Cancel appointment")?;
            writeln!(self.output, "3 - List agenda for a date range")?;
            writeln!(self.output, "4 - List full agenda")?;
            writeln!(self.output, "5 - Back to main menu")?;

            let Some(choice) = self.prompt("Choose an option: ")? else {
                return Ok(false);
            };

            match choice.as_str() {
                "1" => {
                    let Some([id, date, start, end]) = self.prompt_all([
                        "Patient ID: ",
                        "Appointment date (DD/MM/YYYY): ",
                        "Start time (HHMM): ",
                        "End time (HHMM): ",
                    ])?
                    else {
                        return Ok(false);
                    };
                    match self.desk.book_appointment(&id, &date, &start, &end) {
                        Ok(confirmation) => writeln!(self.output, "{}", confirmation.message)?,
                        Err(err) => writeln!(self.output, "Could not book appointment: {}.", err)?,
                    }
                }
                "2" => {
                    let Some(id) = self.prompt("ID of the patient whose appointment to cancel: ")? else {
                        return Ok(false);
                    };
                    if self.desk.cancel_appointment(&id) {
                        writeln!(self.output, "Appointment cancelled.")?;
                    } else {
                        writeln!(self.output, "Invalid ID or patient has no future appointment.")?;
                    }
                }
                "3" => {
                    let Some([from, to]) =
                        self.prompt_all(["Start date (DD/MM/YYYY): ", "End date (DD/MM/YYYY): "])?
                    else {
                        return Ok(false);
                    };
                    self.print_agenda(&AgendaQuery::DateRange { from, to })?;
                }
                "4" => self.print_agenda(&AgendaQuery::All)?,
                "5" => return Ok(true),
                _ => writeln!(self.output, "Invalid option. Try again.")?,
            }
        }
    }

    fn print_agenda(&mut self, query: &AgendaQuery) -> Result<()> {
        let appointments: Vec<Appointment> = match self.desk.list_appointments(query) {
            Ok(appointments) => appointments,
            Err(err) => {
                writeln!(self.output, "Could not list agenda: {}.", err)?;
                return Ok(());
            }
        };

        writeln!(self.output, "--- Agenda ---")?;
        if appointments.is_empty() {
            writeln!(self.output, "No appointments found.")?;
            return Ok(());
        }
        for appointment in appointments {
            writeln!(self.output, "{}", appointment)?;
        }
        writeln!(self.output, "--- End of agenda ---")?;
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::ClinicPolicy;
    use crate::test_support::fixture_clock;

    fn run_script(desk: &mut ClinicDesk, script: &str) -> String {
        let mut output = Vec::new();
        Shell::new(desk, script.as_bytes(), &mut output).run().unwrap();
        String::from_utf8(output).unwrap()
    }

    fn desk() -> ClinicDesk {
        ClinicDesk::with_clock(ClinicPolicy::default(), fixture_clock())
    }

    #[test]
    fn test_register_and_list() {
        let mut desk = desk();
        let out = run_script(
            &mut desk,
            "1\n1\n12345678901\nMaria Silva\n01/01/1990\n4\n5\n3\n",
        );

        assert!(out.contains("Patient 123.456.789-01 registered."));
        assert!(out.contains("--- Patients by Name ---"));
        assert!(out.contains("ID: 123.456.789-01 | Name: Maria Silva | Birth date: 01/01/1990"));
        assert!(out.contains("Leaving the desk..."));
        assert_eq!(desk.patients().count(), 1);
    }

    #[test]
    fn test_rejection_is_reported() {
        let mut desk = desk();
        let out = run_script(&mut desk, "1\n1\n123\nMaria Silva\n01/01/1990\n5\n3\n");

        assert!(out.contains("Could not register patient: invalid identifier"));
        assert!(desk.patients().is_empty());
    }

    #[test]
    fn test_book_list_and_cancel() {
        let mut desk = desk();
        desk.register_patient("12345678901", "Maria Silva", "01/01/1990").unwrap();

        let out = run_script(
            &mut desk,
            "2\n1\n12345678901\n12/03/2026\n0800\n0830\n4\n2\n12345678901\n3\n01/03/2026\n31/03/2026\n5\n3\n",
        );

        assert!(out.contains("Appointment booked for 123.456.789-01 on 12/03/2026 from 08:00 to 08:30 (30 min)"));
        assert!(out.contains("ID: 123.456.789-01 | Date: 12/03/2026 | Time: 08:00 - 08:30"));
        assert!(out.contains("Appointment cancelled."));
        assert!(out.contains("No appointments found."));
        assert!(desk.appointments().is_empty());
    }

    #[test]
    fn test_blocked_removal_message() {
        let mut desk = desk();
        desk.register_patient("12345678901", "Maria Silva", "01/01/1990").unwrap();
        desk.book_appointment("12345678901", "12/03/2026", "0800", "0830").unwrap();

        let out = run_script(&mut desk, "1\n2\n12345678901\n5\n3\n");

        assert!(out.contains("cannot be removed"));
        assert_eq!(desk.patients().count(), 1);
    }

    #[test]
    fn test_end_of_input_stops() {
        let mut desk = desk();
        let out = run_script(&mut desk, "9\n2\n");

        assert!(out.contains("Invalid option. Try again."));
        assert!(out.contains("1 - Book appointment"));
    }
}
