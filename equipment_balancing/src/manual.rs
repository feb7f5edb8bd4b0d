/*!

This is the long-form manual for `equipment_balancing` and `pvbalance`.

## How the devices are distributed

Every pre-voting station serves two streams of voters: the in-precinct
voters (`intra`), who vote with a ballot printed on the spot, and the
out-of-precinct voters (`extra`), who receive a ballot and a return envelope.
Each stream has its own ballot-printing devices.

The turnout reports give, every few hours, the cumulative number of voters of
each stream since the opening of the day. The demand of a report is the
increase since the previous report of the same day. A count that goes down
(a correction of the previous report) produces no demand, and a missing
report is not interpolated: the next one carries the voters of the gap.

The demand profile of a station is the sum of the demand of the reports that
fall inside the peak window (11:00 to 18:00 by default, both included), over
all the days.

The devices are then handed out:
1. every station receives one device per stream,
2. the remaining deployable devices (inventory minus reserve) go one at a
   time to the station and stream with the highest load. The load is the
   demand divided by the devices of that stream. The out-of-precinct demand
   is multiplied by a weight (1.18 by default) because serving these voters
   takes longer.

Ties go to the first station in order, and to the in-precinct stream.

## Congestion

The congestion of a report is the number of voters divided by the devices of
the stream. The summary compares the congestion before the balancing (with
the devices of the inventory) and after. A report is counted as congested
when it reaches the threshold of the election:

| election type | threshold |
|---------------|-----------|
| `president`   | 120       |
| `general`     | 100       |
| `local`       | 60        |

## Requirements

When requested, `pvbalance` also estimates for each station:
- the booths: the average of the three busiest reports, times the seconds a
  voter spends in a booth (90 for `intra`, 100 for `extra`), divided by one
  hour. At least two booths per stream.
- the paper rolls: the voters of the stream are shared among its devices, and
  every device receives enough rolls for its share (535 ballots per roll for
  `intra`, 500 for `extra`), at least one. One spare roll is added, two for a
  station with ten devices or more.

## Input formats

All the files can be either CSV (UTF-8) or Excel (.xlsx). The format is
deduced from the extension of the file, unless `provider` is set.

### Turnout reports

One file per report. The first rows hold a title with the day and the time of
the report, as markers `[1일차]` and `[09:00]`. Then comes a header row and
one row per station:

```text
제21대 대통령선거 사전투표 투표율 현황
[1일차] [09:00] 기준
시도명,구시군명,읍면동명,사전투표소명,관내사전투표자수,관외사전투표자수
서울특별시,중구,소공동,소공동사전투표소,"1,200",300
```

The rows of totals (합계, 소계, 총계, 누계) are ignored. A row with a count that
cannot be read is reported and skipped, for both streams. The day and hour may be given in the
configuration when the file has no marker.

### Device inventory

Two layouts are understood:
- the template, with a header row holding the columns `사전투표소명`,
  `관내장비수` and `관외장비수`
- the official inventory, with the station in column C and the devices in
  columns F and G.

In both layouts, cells D7 and H7 may hold the number of devices owned and the
number kept in reserve. Counts such as `3대` are accepted, and an unreadable
count, or a count below one, means one device.

A station of the turnout reports is matched with the inventory by its name,
or else by the first entry whose name contains it or is contained in it.

### Electorate

Two files with the electorate of every district (읍면동), one for the
reference election and one for the coming election. The district is in
column A and the electorate in column D. The growth of the electorate of a
district applies to the in-precinct turnout of the stations whose name
contains the district.

## Configuration

```json
{
  "outputSettings": {
    "contestName": "jung-gu",
    "electionType": "general",
    "outputDirectory": "output"
  },
  "turnoutFileSources": [
    { "filePath": "day1_0900.csv" },
    { "filePath": "day1_1000.xlsx", "excelWorksheetName": "Sheet1" },
    { "provider": "csv", "filePath": "late.txt", "day": 2, "hour": 18 }
  ],
  "equipmentFile": { "filePath": "equipment.csv" },
  "electorateFiles": {
    "past": { "filePath": "electorate_2022.csv" },
    "recent": { "filePath": "electorate_2024.csv" }
  },
  "stations": [
    { "name": "회현동사전투표소", "rateExtra": 10.0 }
  ],
  "rules": {
    "totalAssets": 40,
    "reserve": 5,
    "extraWeight": 1.18,
    "hourWindow": [11, 18],
    "globalRate": 0.0,
    "requirements": {}
  }
}
```

Only `outputSettings.contestName` is mandatory. The paths are relative to the
configuration file.

`rules`:
- `totalAssets`: the devices owned. By default, the value of the inventory,
  or else the devices of the inventory plus the reserve.
- `reserve`: the devices kept aside, 5 by default.
- `globalRate`: expected change of the turnout of every station, in percent.
  A station may override it with `rateIntra` and `rateExtra`, and set
  `electorateRate` instead of the growth computed from the electorate files.
- `requirements`: when present, the booths and rolls are estimated. The
  fields `boothSecondsIntra`, `boothSecondsExtra`, `rollCapacityIntra` and
  `rollCapacityExtra` change the defaults.

Turnout files also accept `stationColumn`, `intraColumn` and `extraColumn` to
use other column names.

## Summary

The summary is a JSON document with the sections `config`, `inputs`,
`results`, `congestion` and (when requested) `requirements`. Under
`congestion`, `hourlyAfter` gives the congestion of every station and hour
with the recommended devices, averaged over the days. The demand and
congestion values are written with one decimal.

 */
