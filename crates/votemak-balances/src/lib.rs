/*!
# Votemak Balance Inputs

Parsing and normalization of the balance sets a merkle distribution is built from.

## Accepted shapes

### Legacy map (`balances.json`)
`{ "<address>": <amount> }` where the amount is a JSON integer or a decimal string.

### Record list (`balances.json` or `balances.csv`)
Rows with columns:
- `address`: account address, any casing; mixed case must be a valid checksum
- `earnings`: decimal (or `0x` hex) integer amount, strictly positive
- `reasons`: free text; derives the `isSOCKS` / `isLP` / `isUser` flags when non-empty

## Usage

```rust,no_run
use votemak_balances::{normalize_balances, read_balance_file, BalanceResult};

fn example() -> BalanceResult<()> {
    let input = read_balance_file("balances.csv")?;
    let balances = normalize_balances(input)?;
    println!("{} accounts", balances.len());
    Ok(())
}
```
*/

pub mod errors;
pub mod io;
pub mod normalize;
pub mod schemas;

pub use errors::{BalanceError, BalanceResult};
pub use io::{
    balance_input_from_json, read_balance_csv, read_balance_file, read_balance_json,
    write_balance_csv,
};
pub use normalize::{
    derive_flags, normalize_amounts, normalize_balances, Flags, NormalizedBalance,
    NormalizedBalances, FLAG_VOCABULARY,
};
pub use schemas::{BalanceCsvRow, BalanceInput, BalanceRecord, RawAmount, BALANCE_CSV_HEADERS};
