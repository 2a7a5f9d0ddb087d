/*!

This is the long-form manual for `division_network` and `divnet`.

## Input format

The House of Commons publishes every division (recorded vote) as a small text
file on the [Commons votes portal](https://commonsvotes.digiminster.com). `divnet fetch`
stores them as `csv_files/0001.csv`, `csv_files/0002.csv` and so on. The files have a
fixed layout, read line by line:

| line | content                                   |
|------|-------------------------------------------|
| 1    | the division number (first number on the line) |
| 2    | `Date: dd/mm/yyyy`                        |
| 4    | the title of the division                 |
| 6    | `Ayes: <count>`                           |
| 7    | `Noes: <count>`                           |
| 11.. | one vote per line                          |

Each vote line has exactly five quoted fields:

```text
"Diane Abbott","Labour","Hackney North and Stoke Newington","Aye",""
```

A file that does not follow this layout is rejected as a whole. By default this
stops the loading of the directory; use `--skip-malformed` (or `"skipMalformed": true`)
to skip such files with a warning instead.

When two files describe the same division, the file that comes last in
alphabetical order is kept.

## The network

The selected divisions and the legislators that voted in them form a graph with
two kinds of nodes. A legislator is linked to a division when they voted aye.
Legislators who voted no everywhere have no link and are removed before drawing,
unless `--keep-empty-nodes` is given.

Division nodes are green when the ayes outnumber the noes, red otherwise.
Legislator nodes take the colour of their party.

## Layouts

- `spring` (default): force-directed placement. Legislators who vote together end up close.
- `circular`: every node on one circle.
- `shell`: divisions on an inner circle, legislators on an outer circle.
- `spectral`: placement from the two eigenvectors of the graph laplacian that follow the constant one.
  The laplacian is diagonalized as a dense matrix, which stays fast for a few hundred legislators.
- `random`: uniform random placement.

`spring` and `random` use the `--seed` option, so the same seed gives the same figure.
Computing a spring layout gets slow with many divisions: stay below ten divisions.

## Configuration

`divnet` accepts a configuration file in JSON with the `--config` flag. All the
fields are optional, and flags given on the command line take precedence.

```json
{
  "dataDirectory": "csv_files",
  "selection": [441, 393, 392, 391],
  "layout": "spring",
  "removeEmptyNodes": true,
  "seed": 42,
  "title": "Network graph for votes at uk parliament.",
  "skipMalformed": false,
  "outputPath": "figure.html",
  "partyColors": {
    "Alliance": "#f6cb2f"
  }
}
```

Relative paths are relative to the directory of the configuration file.

The colour table starts with the parties of the House of Commons. `partyColors`
adds parties or replaces their colour. A legislator whose party has no colour
makes the rendering fail.

## Output

`render` writes the figure in the JSON format of plotly.js. When the output path ends
with `.html`, a standalone page that loads plotly.js is written instead. The
output `stdout` prints the JSON.

With `--reference <file>`, the figure is compared to a previously stored JSON figure,
and the differences are printed. Use a fixed `--seed` to get comparable figures.

`matrix` writes the votes of every legislator in every division as a CSV table:
1 for aye, -1 for no, 0 otherwise.

 */
