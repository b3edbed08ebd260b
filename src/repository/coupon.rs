use diesel::prelude::*;

use crate::domain::coupon::Coupon as DomainCoupon;
use crate::models::coupon::Coupon as DbCoupon;
use crate::repository::{CouponReader, DieselRepository, RepositoryError, RepositoryResult};

impl CouponReader for DieselRepository {
    fn get_coupon_by_id(&self, id: i32) -> RepositoryResult<Option<DomainCoupon>> {
        use crate::schema::coupons;

        let mut conn = self.conn()?;
        let coupon = coupons::table
            .filter(coupons::id.eq(id))
            .first::<DbCoupon>(&mut conn)
            .optional()?;

        coupon.map(into_domain).transpose()
    }

    fn get_coupon_by_code(&self, code: &str) -> RepositoryResult<Option<DomainCoupon>> {
        use crate::schema::coupons;

        let mut conn = self.conn()?;
        let coupon = coupons::table
            .filter(coupons::code.eq(code))
            .first::<DbCoupon>(&mut conn)
            .optional()?;

        coupon.map(into_domain).transpose()
    }

    fn count_redemptions(&self, coupon_id: i32) -> RepositoryResult<i64> {
        use crate::schema::coupon_redemptions;

        let mut conn = self.conn()?;
        let count = coupon_redemptions::table
            .filter(coupon_redemptions::coupon_id.eq(coupon_id))
            .count()
            .get_result::<i64>(&mut conn)?;

        Ok(count)
    }

    fn count_user_redemptions(&self, coupon_id: i32, user_id: i32) -> RepositoryResult<i64> {
        use crate::schema::coupon_redemptions;

        let mut conn = self.conn()?;
        let count = coupon_redemptions::table
            .filter(coupon_redemptions::coupon_id.eq(coupon_id))
            .filter(coupon_redemptions::user_id.eq(user_id))
            .count()
            .get_result::<i64>(&mut conn)?;

        Ok(count)
    }
}

fn into_domain(row: DbCoupon) -> RepositoryResult<DomainCoupon> {
    let id = row.id;
    row.into_domain()
        .ok_or_else(|| RepositoryError::Corrupt(format!("coupon {id} has an unknown kind")))
}
