use std::fs::File;
use std::io::Read;
use std::path::Path;

use roster_common::error::{RosterError, RosterResult};
use roster_matching::{ContactRecord, LabeledPair};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Id,
    FirstName,
    LastName,
    Email,
    Phone,
    AddressLine1,
    City,
    State,
    PostalCode,
}

/// Map a CSV header to the contact field it holds. Matching ignores case and
/// treats spaces and hyphens as underscores.
fn column_for(header: &str) -> Option<Column> {
    let key = header.trim().to_lowercase().replace([' ', '-'], "_");
    let column = match key.as_str() {
        "id" | "contact_id" | "identifier" => Column::Id,
        "first_name" | "first" | "firstname" => Column::FirstName,
        "last_name" | "last" | "lastname" | "surname" => Column::LastName,
        "email" | "email_address" | "normalized_email" => Column::Email,
        "phone" | "phone_number" | "raw_phone" => Column::Phone,
        "address_line_1" | "address" | "address1" | "street" => Column::AddressLine1,
        "city" => Column::City,
        "state" | "province" => Column::State,
        "postal_code" | "zip" | "zipcode" | "postcode" => Column::PostalCode,
        _ => return None,
    };
    Some(column)
}

fn csv_error(e: csv::Error) -> RosterError {
    RosterError::Validation(format!("malformed CSV: {e}"))
}

fn open(path: &Path) -> RosterResult<File> {
    File::open(path).map_err(|e| RosterError::Io(format!("{}: {e}", path.display())))
}

pub fn load_contacts(path: &Path) -> RosterResult<Vec<ContactRecord>> {
    let contacts = read_contacts(open(path)?)?;
    tracing::info!(path = %path.display(), contacts = contacts.len(), "loaded contacts CSV");
    Ok(contacts)
}

pub fn read_contacts<R: Read>(reader: R) -> RosterResult<Vec<ContactRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns: Vec<Option<Column>> = rdr.headers().map_err(csv_error)?.iter().map(column_for).collect();
    if !columns.contains(&Some(Column::Id)) {
        return Err(RosterError::Validation(
            "contacts CSV needs an id column (id, contact_id or identifier)".to_owned(),
        ));
    }

    let mut contacts = Vec::new();
    for (index, row) in rdr.records().enumerate() {
        let row = row.map_err(csv_error)?;
        let mut record = ContactRecord::default();

        for (column, value) in columns.iter().zip(row.iter()) {
            let Some(column) = column else { continue };
            if value.is_empty() {
                continue;
            }
            let slot = match column {
                Column::Id => {
                    record.id = value.to_owned();
                    continue;
                }
                Column::FirstName => &mut record.first_name,
                Column::LastName => &mut record.last_name,
                Column::Email => &mut record.email,
                Column::Phone => &mut record.phone,
                Column::AddressLine1 => &mut record.address_line_1,
                Column::City => &mut record.city,
                Column::State => &mut record.state,
                Column::PostalCode => &mut record.postal_code,
            };
            *slot = Some(value.to_owned());
        }

        if record.id.is_empty() {
            // header is line 1
            tracing::warn!(line = index + 2, "skipping contact row without an id");
            continue;
        }
        contacts.push(record);
    }

    Ok(contacts)
}

#[derive(Debug, Deserialize)]
struct LabelRow {
    left_id: String,
    right_id: String,
    is_duplicate: String,
}

fn parse_verdict(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => Some(true),
        "false" | "0" | "no" | "n" => Some(false),
        _ => None,
    }
}

pub fn load_labels(path: &Path) -> RosterResult<Vec<LabeledPair>> {
    let labels = read_labels(open(path)?)?;
    tracing::info!(path = %path.display(), labels = labels.len(), "loaded labeled pairs");
    Ok(labels)
}

pub fn read_labels<R: Read>(reader: R) -> RosterResult<Vec<LabeledPair>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut labels = Vec::new();
    for (index, row) in rdr.deserialize::<LabelRow>().enumerate() {
        let row = row.map_err(csv_error)?;
        let is_duplicate = parse_verdict(&row.is_duplicate).ok_or_else(|| {
            RosterError::Validation(format!(
                "line {}: is_duplicate must be true/false, got {:?}",
                index + 2,
                row.is_duplicate
            ))
        })?;
        labels.push(LabeledPair {
            left_id: row.left_id,
            right_id: row.right_id,
            is_duplicate,
        });
    }
    Ok(labels)
}
