//! Fixed catalog of analytical queries
//!
//! Ten predefined read-only statements over the `rides` table. Every value in
//! these statements is a hard-coded literal; nothing here is built from user
//! input (user-driven filtering lives in `query::filter` and uses bound
//! parameters instead).

use serde::Serialize;
use std::str::FromStr;

/// Identifier of a predefined analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Analysis {
    SuccessfulBookings,
    AvgRideDistanceByVehicle,
    CustomerCancellations,
    Top5Customers,
    DriverCancellations,
    PrimeSedanRatings,
    UpiPayments,
    AvgCustomerRating,
    TotalBookingValue,
    IncompleteRides,
}

/// How the presentation layer should render an analysis result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartHint {
    /// Table plus a bar chart: column 0 is the category axis, column 1 the value axis
    Bar,
    /// Table only
    TableOnly,
}

impl Analysis {
    /// Every catalog entry, in dashboard menu order
    pub const ALL: [Analysis; 10] = [
        Analysis::SuccessfulBookings,
        Analysis::AvgRideDistanceByVehicle,
        Analysis::CustomerCancellations,
        Analysis::Top5Customers,
        Analysis::DriverCancellations,
        Analysis::PrimeSedanRatings,
        Analysis::UpiPayments,
        Analysis::AvgCustomerRating,
        Analysis::TotalBookingValue,
        Analysis::IncompleteRides,
    ];

    /// Stable identifier used by the API and the UI menu
    pub fn id(&self) -> &'static str {
        match self {
            Analysis::SuccessfulBookings => "successful_bookings",
            Analysis::AvgRideDistanceByVehicle => "avg_ride_distance_by_vehicle",
            Analysis::CustomerCancellations => "customer_cancellations",
            Analysis::Top5Customers => "top_5_customers",
            Analysis::DriverCancellations => "driver_cancellations",
            Analysis::PrimeSedanRatings => "prime_sedan_ratings",
            Analysis::UpiPayments => "upi_payments",
            Analysis::AvgCustomerRating => "avg_customer_rating",
            Analysis::TotalBookingValue => "total_booking_value",
            Analysis::IncompleteRides => "incomplete_rides",
        }
    }

    /// Human-readable title for menus and headings
    pub fn title(&self) -> &'static str {
        match self {
            Analysis::SuccessfulBookings => "Successful Bookings",
            Analysis::AvgRideDistanceByVehicle => "Avg Ride Distance by Vehicle",
            Analysis::CustomerCancellations => "Customer Cancellations",
            Analysis::Top5Customers => "Top 5 Customers",
            Analysis::DriverCancellations => "Driver Cancellations",
            Analysis::PrimeSedanRatings => "Prime Sedan Ratings",
            Analysis::UpiPayments => "UPI Payments",
            Analysis::AvgCustomerRating => "Avg Customer Rating",
            Analysis::TotalBookingValue => "Total Booking Value",
            Analysis::IncompleteRides => "Incomplete Rides",
        }
    }

    /// The literal SQL statement for this analysis
    pub fn sql(&self) -> &'static str {
        match self {
            Analysis::SuccessfulBookings => {
                "SELECT *
                 FROM rides
                 WHERE booking_status = 'Success'"
            }
            Analysis::AvgRideDistanceByVehicle => {
                "SELECT vehicle_type,
                        AVG(ride_distance) AS avg_ride_distance
                 FROM rides
                 WHERE booking_status = 'Success'
                 GROUP BY vehicle_type"
            }
            Analysis::CustomerCancellations => {
                "SELECT COUNT(*) AS total_canceled_rides_by_customers
                 FROM rides
                 WHERE booking_status = 'Canceled by Customer'"
            }
            Analysis::Top5Customers => {
                "SELECT customer_id,
                        vehicle_type,
                        COUNT(*) AS book_rides_count
                 FROM rides
                 WHERE booking_status = 'Success'
                 GROUP BY customer_id, vehicle_type
                 ORDER BY book_rides_count DESC
                 LIMIT 5"
            }
            Analysis::DriverCancellations => {
                "SELECT COUNT(*) AS canceled_rides_by_drivers
                 FROM rides
                 WHERE booking_status = 'Canceled by Driver'
                   AND canceled_rides_by_driver = 'Personal & Car related issue'"
            }
            Analysis::PrimeSedanRatings => {
                "SELECT MAX(driver_ratings) AS max_driver_rating,
                        MIN(driver_ratings) AS min_driver_rating
                 FROM rides
                 WHERE vehicle_type = 'Prime Sedan'"
            }
            Analysis::UpiPayments => {
                "SELECT *
                 FROM rides
                 WHERE payment_method = 'UPI'"
            }
            Analysis::AvgCustomerRating => {
                "SELECT vehicle_type,
                        AVG(customer_rating) AS avg_customer_rating
                 FROM rides
                 GROUP BY vehicle_type"
            }
            Analysis::TotalBookingValue => {
                "SELECT SUM(booking_value) AS total_booking_value
                 FROM rides
                 WHERE booking_status = 'Success'"
            }
            Analysis::IncompleteRides => {
                "SELECT booking_id,
                        booking_status,
                        incomplete_rides_reason
                 FROM rides
                 WHERE booking_status != 'Success'"
            }
        }
    }

    /// Chart hint: grouped averages and totals render as bar charts
    pub fn chart(&self) -> ChartHint {
        match self {
            Analysis::AvgRideDistanceByVehicle
            | Analysis::AvgCustomerRating
            | Analysis::TotalBookingValue => ChartHint::Bar,
            _ => ChartHint::TableOnly,
        }
    }
}

impl FromStr for Analysis {
    type Err = ParseAnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Analysis::ALL
            .iter()
            .find(|a| a.id() == s)
            .copied()
            .ok_or_else(|| ParseAnalysisError(s.to_string()))
    }
}

impl std::fmt::Display for Analysis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown analysis identifier: {0}")]
pub struct ParseAnalysisError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_id_round_trips() {
        for analysis in Analysis::ALL {
            assert_eq!(analysis.id().parse::<Analysis>().unwrap(), analysis);
        }
    }

    #[test]
    fn test_unknown_id_is_error() {
        assert!("weekly_revenue".parse::<Analysis>().is_err());
    }

    #[test]
    fn test_statements_are_read_only() {
        for analysis in Analysis::ALL {
            let sql = analysis.sql().trim_start();
            assert!(sql.starts_with("SELECT"), "{} must be a SELECT", analysis);
        }
    }

    #[test]
    fn test_chart_hints() {
        assert_eq!(Analysis::AvgRideDistanceByVehicle.chart(), ChartHint::Bar);
        assert_eq!(Analysis::TotalBookingValue.chart(), ChartHint::Bar);
        assert_eq!(Analysis::AvgCustomerRating.chart(), ChartHint::Bar);
        assert_eq!(Analysis::SuccessfulBookings.chart(), ChartHint::TableOnly);
        assert_eq!(Analysis::Top5Customers.chart(), ChartHint::TableOnly);
    }
}
