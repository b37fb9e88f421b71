use std::io::Write;

use serde::Serialize;

use crate::data::Catalog;
use crate::error::Result;
use crate::ledger::XpLedger;

#[derive(Serialize)]
struct ReportRow<'a> {
    index: usize,
    key: &'a str,
    value: String,
    label: &'a str,
    cost: i64,
    running_total: i64,
}

/// Write the ledger as CSV: one row per entry with its label, cost and running total.
pub fn write_csv<W: Write>(ledger: &XpLedger, catalog: &Catalog, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for (index, entry) in ledger.labelled(catalog).iter().enumerate() {
        csv_writer.serialize(ReportRow {
            index,
            key: &entry.key,
            value: entry.value.to_string(),
            label: &entry.label,
            cost: entry.cost,
            running_total: entry.running_total,
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::XpItem;

    #[test]
    fn csv_has_header_and_one_row_per_entry() {
        let ledger = XpLedger::from_items(vec![
            XpItem::GainXp { xp: 3 },
            XpItem::PilotSkillIncrease { pilot_skill: 3 },
        ]);
        let mut out = Vec::new();
        write_csv(&ledger, &Catalog::default(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "index,key,value,label,cost,running_total");
        assert_eq!(lines[1], "0,XP,3,Gain XP,3,3");
        assert_eq!(lines[2], "1,PS,3,Upgrade pilot skill: PS 3,-6,-3");
    }
}
